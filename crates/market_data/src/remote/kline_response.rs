use chrono::DateTime;
use common::models::Kline;
use serde::Deserialize;
use serde_json::Value;

use crate::error::MarketDataError;
use crate::traits::RemoteResponse;

// open_time, open, high, low, close, volume
const REQUIRED_FIELDS: usize = 6;

/// A single row of the `/api/v3/klines` response.
///
/// Binance sends `[open_time, open, high, low, close, volume, close_time, ...]`
/// with prices as strings. Only the leading fields are read so extra trailing
/// columns never break parsing.
#[derive(Deserialize, Debug)]
pub struct KlineRow(pub Vec<Value>);

impl KlineRow {
    fn field(&self, index: usize, name: &str) -> Result<f64, MarketDataError> {
        let value = match &self.0[index] {
            Value::String(s) => s.parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };

        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| MarketDataError::Malformed(format!("invalid {}: {}", name, self.0[index])))
    }

    fn open_time_millis(&self) -> Result<i64, MarketDataError> {
        let millis = match &self.0[0] {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        };
        millis.ok_or_else(|| MarketDataError::Malformed(format!("invalid open_time: {}", self.0[0])))
    }
}

impl RemoteResponse<Kline> for KlineRow {
    fn to_model(&self) -> Result<Kline, MarketDataError> {
        if self.0.len() < REQUIRED_FIELDS {
            return Err(MarketDataError::Malformed(format!(
                "expected at least {} fields, got {}",
                REQUIRED_FIELDS,
                self.0.len()
            )));
        }

        let millis = self.open_time_millis()?;
        let open_time = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            MarketDataError::Malformed(format!("open_time out of range: {}", millis))
        })?;

        Ok(Kline {
            open_time,
            open_price: self.field(1, "open")?,
            high_price: self.field(2, "high")?,
            low_price: self.field(3, "low")?,
            close_price: self.field(4, "close")?,
            volume: self.field(5, "volume")?,
        })
    }
}

/// Parses a klines response body, checking that rows are strictly ascending by open time.
pub fn parse_klines(body: &str) -> Result<Vec<Kline>, MarketDataError> {
    let rows: Vec<KlineRow> = serde_json::from_str(body)?;

    let klines = rows
        .iter()
        .map(|row| row.to_model())
        .collect::<Result<Vec<Kline>, _>>()?;

    if let Some(pos) = klines
        .windows(2)
        .position(|pair| pair[1].open_time <= pair[0].open_time)
    {
        return Err(MarketDataError::OutOfOrder(pos + 1));
    }

    Ok(klines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINANCE_BODY: &str = r#"[
        [1499040000000, "0.01634790", "0.80000000", "0.01575800", "0.01577100", "148976.11427815",
         1499644799999, "2434.19055334", 308, "1756.87402397", "28.46694368", "0"],
        [1499040900000, "0.01577100", "0.01600000", "0.01550000", "0.01590000", "1000.5",
         1499041799999, "15.9", 12, "500.0", "7.9", "0"]
    ]"#;

    #[test]
    fn test_parse_full_binance_rows() {
        let klines = parse_klines(BINANCE_BODY).unwrap();

        assert_eq!(klines.len(), 2);
        assert_eq!(klines[0].open_time.timestamp_millis(), 1499040000000);
        assert_eq!(klines[0].high_price, 0.8);
        assert_eq!(klines[0].low_price, 0.015758);
        assert_eq!(klines[0].close_price, 0.015771);
        assert_eq!(klines[1].volume, 1000.5);
    }

    #[test]
    fn test_numeric_fields_and_short_rows() {
        let klines = parse_klines("[[1000, 1, 2, 0.5, 1.5, 10]]").unwrap();
        assert_eq!(klines[0].close_price, 1.5);

        let err = parse_klines(r#"[[1000, "1", "2", "0.5"]]"#).unwrap_err();
        assert!(matches!(err, MarketDataError::Malformed(_)));
    }

    #[test]
    fn test_invalid_numbers_are_malformed() {
        let err = parse_klines(r#"[[1000, "1", "abc", "0.5", "1.5", "10"]]"#).unwrap_err();
        assert!(err.to_string().contains("high"));

        let err = parse_klines(r#"[[1000, "1", "2", "0.5", "NaN", "10"]]"#).unwrap_err();
        assert!(err.to_string().contains("close"));

        let err = parse_klines(r#"[[null, "1", "2", "0.5", "1.5", "10"]]"#).unwrap_err();
        assert!(err.to_string().contains("open_time"));
    }

    #[test]
    fn test_not_an_array_is_malformed() {
        let err = parse_klines(r#"{"code": -1121, "msg": "Invalid symbol."}"#).unwrap_err();
        assert!(matches!(err, MarketDataError::Malformed(_)));
    }

    #[test]
    fn test_out_of_order_and_duplicate_rows_rejected() {
        let body = r#"[[2000, 1, 2, 0.5, 1.5, 10], [1000, 1, 2, 0.5, 1.5, 10]]"#;
        assert!(matches!(parse_klines(body), Err(MarketDataError::OutOfOrder(1))));

        let body = r#"[[1000, 1, 2, 0.5, 1.5, 10], [1000, 1, 2, 0.5, 1.5, 10]]"#;
        assert!(matches!(parse_klines(body), Err(MarketDataError::OutOfOrder(1))));
    }

    #[test]
    fn test_empty_response() {
        assert!(parse_klines("[]").unwrap().is_empty());
    }
}
