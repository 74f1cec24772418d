pub mod notifier;
pub mod signal_service;
pub mod telegram_service;
