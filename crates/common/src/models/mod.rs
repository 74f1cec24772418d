pub mod kline;
pub mod signal;

pub use kline::Kline;
pub use signal::{Action, MarketCondition, Signal};
