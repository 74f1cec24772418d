pub mod alert;
pub mod classifier;
pub mod error;
pub mod indicators;
pub mod pipeline;

pub use alert::format_alert;
pub use classifier::SignalClassifier;
pub use error::StrategyError;
pub use pipeline::{IndicatorPipeline, IndicatorSnapshot};
