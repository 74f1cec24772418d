use std::time::Duration;

use async_trait::async_trait;
use common::models::Kline;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, warn};

use crate::error::MarketDataError;
use crate::remote::kline_response::parse_klines;
use crate::traits::KlineProvider;

#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: &str) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .user_agent("binance_signal_bot/0.1.0")
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.base_url)
    }

    fn check_status(status: StatusCode, body: &str) -> Result<(), MarketDataError> {
        if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == 418 {
            warn!("Rate limit response from Binance: HTTP {}", status.as_u16());
            return Err(MarketDataError::RateLimited(status.as_u16()));
        }
        if !status.is_success() {
            error!("Binance klines request failed: {}", body);
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KlineProvider for BinanceClient {
    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Kline>, MarketDataError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.klines_url())
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if let Some(used_weight) = response
            .headers()
            .get("x-mbx-used-weight-1m")
            .and_then(|v| v.to_str().ok())
        {
            debug!("Used weights: {}/6000", used_weight);
        }

        let status = response.status();
        let body = response.text().await?;
        Self::check_status(status, &body)?;

        let klines = parse_klines(&body)?;
        debug!("Fetched {} klines for {} ({})", klines.len(), symbol, interval);
        Ok(klines)
    }
}
