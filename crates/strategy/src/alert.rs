use chrono::{DateTime, Utc};
use common::models::Signal;

const MISSING: &str = "n/a";

/// Renders the Telegram alert for one symbol, stamped with the time it was generated.
///
/// ```text
/// 2024-05-01 12:27 BTCUSDT
/// Market Condition: Sideways
/// Action: Buy
/// Signal: Sideways Oversold (Buy with 5% position)
/// Close Price: 99.0
/// Lower Band: 100.00
/// Upper Band: 110.00
/// ```
pub fn format_alert(symbol: &str, signal: &Signal, generated_at: DateTime<Utc>) -> String {
    // Debug keeps the decimal point on whole prices (101.0, not 101)
    let close = signal
        .close_price
        .map(|c| format!("{:?}", c))
        .unwrap_or_else(|| MISSING.to_string());

    format!(
        "{} {}\nMarket Condition: {}\nAction: {}\nSignal: {}\nClose Price: {}\nLower Band: {}\nUpper Band: {}",
        generated_at.format("%Y-%m-%d %H:%M"),
        symbol,
        signal.market_condition,
        signal.action,
        signal.label,
        close,
        band(signal.lower_band),
        band(signal.upper_band),
    )
}

fn band(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| MISSING.to_string())
}
