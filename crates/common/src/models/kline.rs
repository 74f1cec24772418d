use chrono::{DateTime, Utc};

/// One fixed-interval OHLCV bar as returned by the klines endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Kline {
    pub open_time: DateTime<Utc>,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
}

impl ta::Open for Kline {
    fn open(&self) -> f64 {
        self.open_price
    }
}

impl ta::High for Kline {
    fn high(&self) -> f64 {
        self.high_price
    }
}

impl ta::Low for Kline {
    fn low(&self) -> f64 {
        self.low_price
    }
}

impl ta::Close for Kline {
    fn close(&self) -> f64 {
        self.close_price
    }
}

impl ta::Volume for Kline {
    fn volume(&self) -> f64 {
        self.volume
    }
}
