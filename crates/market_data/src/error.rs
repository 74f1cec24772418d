use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Rate limited by exchange (HTTP {0})")]
    RateLimited(u16),
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed kline payload: {0}")]
    Malformed(String),
    #[error("Klines out of order at row {0}")]
    OutOfOrder(usize),
}

impl From<serde_json::Error> for MarketDataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}
