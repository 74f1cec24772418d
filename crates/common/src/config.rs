use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Kline intervals accepted by the Binance REST API.
pub const INTERVALS: &[&str] = &[
    "1s", "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w",
    "1M",
];

/// Upper bound the klines endpoint accepts for `limit`.
pub const MAX_KLINE_LIMIT: usize = 1000;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0} must be set together with {1}")]
    Incomplete(&'static str, &'static str),
    #[error("SYMBOLS must contain at least one symbol")]
    NoSymbols,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
    /// Alternative Bot API server, e.g. a self-hosted one.
    pub api_url: Option<String>,
}

/// Indicator periods and decision thresholds shared by the pipeline and the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub momentum_period: usize,
    pub adx_period: usize,
    pub band_period: usize,
    pub band_multiplier: f64,
    pub adx_threshold: f64,
    pub momentum_threshold: f64,
    pub sideways_position: f64,
    pub trend_position: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            momentum_period: 14,
            adx_period: 72,
            band_period: 20,
            band_multiplier: 2.0,
            adx_threshold: 20.0,
            momentum_threshold: 200.0,
            sideways_position: 0.05,
            trend_position: 0.10,
        }
    }
}

impl StrategyConfig {
    /// Smallest window for which every indicator is defined.
    pub fn min_klines(&self) -> usize {
        self.adx_period
            .saturating_mul(2)
            .max(self.momentum_period.saturating_add(1))
            .max(self.band_period)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub symbols: Vec<String>,
    pub interval: String,
    pub limit: usize,
    pub base_url: String,
    pub telegram: Option<TelegramConfig>,
    pub max_concurrency: usize,
    pub strategy: StrategyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
            interval: "15m".to_string(),
            limit: 200,
            base_url: DEFAULT_BASE_URL.to_string(),
            telegram: None,
            max_concurrency: 1,
            strategy: StrategyConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let symbols = match get("SYMBOLS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.symbols,
        };
        if symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }

        let interval = get("INTERVAL").unwrap_or(defaults.interval);
        if !INTERVALS.contains(&interval.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "INTERVAL",
                value: interval,
                reason: format!("expected one of {}", INTERVALS.join(", ")),
            });
        }

        let limit = parse_or(&get, "KLINE_LIMIT", defaults.limit)?;
        if limit == 0 || limit > MAX_KLINE_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: "KLINE_LIMIT",
                value: limit.to_string(),
                reason: format!("must be between 1 and {}", MAX_KLINE_LIMIT),
            });
        }

        let base_url = get("BINANCE_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id: chat_id.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "TELEGRAM_CHAT_ID",
                    value: chat_id.clone(),
                    reason: "must be a number".to_string(),
                })?,
                api_url: get("TELEGRAM_API_URL"),
            }),
            (Some(_), None) => {
                return Err(ConfigError::Incomplete("TELEGRAM_BOT_TOKEN", "TELEGRAM_CHAT_ID"));
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete("TELEGRAM_CHAT_ID", "TELEGRAM_BOT_TOKEN"));
            }
            (None, None) => None,
        };

        let max_concurrency = parse_or(&get, "MAX_CONCURRENCY", defaults.max_concurrency)?.max(1);

        let base = defaults.strategy;
        let strategy = StrategyConfig {
            momentum_period: period(&get, "MOMENTUM_PERIOD", base.momentum_period, MAX_KLINE_LIMIT)?,
            adx_period: period(&get, "ADX_PERIOD", base.adx_period, MAX_KLINE_LIMIT / 2)?,
            band_period: period(&get, "BAND_PERIOD", base.band_period, MAX_KLINE_LIMIT)?,
            band_multiplier: parse_or(&get, "BAND_MULTIPLIER", base.band_multiplier)?,
            adx_threshold: parse_or(&get, "ADX_THRESHOLD", base.adx_threshold)?,
            momentum_threshold: parse_or(&get, "MOMENTUM_THRESHOLD", base.momentum_threshold)?,
            ..base
        };
        if !(strategy.band_multiplier.is_finite() && strategy.band_multiplier > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "BAND_MULTIPLIER",
                value: strategy.band_multiplier.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }

        Ok(Self {
            symbols,
            interval,
            limit,
            base_url,
            telegram,
            max_concurrency,
            strategy,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

// A period can never usefully exceed the largest window the exchange returns.
fn period<G>(get: &G, key: &'static str, default: usize, max: usize) -> Result<usize, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, key, default)?;
    if value == 0 || value > max {
        return Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: format!("must be between 1 and {}", max),
        });
    }
    Ok(value)
}
