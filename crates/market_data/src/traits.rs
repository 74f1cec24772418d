use async_trait::async_trait;
use common::models::Kline;

use crate::error::MarketDataError;

/// Converts a raw exchange payload into a domain model.
pub trait RemoteResponse<T> {
    fn to_model(&self) -> Result<T, MarketDataError>;
}

/// Source of historical klines, ordered by open time ascending.
#[async_trait]
pub trait KlineProvider: Send + Sync {
    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Kline>, MarketDataError>;
}
