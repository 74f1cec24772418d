pub mod binance_client;
pub mod kline_response;

pub use binance_client::BinanceClient;
pub use kline_response::{KlineRow, parse_klines};
