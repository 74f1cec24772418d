use common::config::StrategyConfig;
use common::models::{Action, MarketCondition, Signal};
use tracing::debug;

use crate::pipeline::IndicatorSnapshot;

pub const SIDEWAYS_OVERSOLD: &str = "Sideways Oversold (Buy with 5% position)";
pub const SIDEWAYS_OVERBOUGHT: &str = "Sideways Overbought (Sell with 5% position)";
pub const OVERBOUGHT: &str = "Overbought (Sell)";
pub const NEUTRAL: &str = "Neutral";

/// Maps the latest indicator values to a market regime and an action.
///
/// Rules are evaluated in order and the first match wins. Position sizes are
/// only ever the configured sideways or trend size, or zero for a hold.
#[derive(Debug, Clone)]
pub struct SignalClassifier {
    adx_threshold: f64,
    momentum_threshold: f64,
    sideways_position: f64,
    trend_position: f64,
}

impl SignalClassifier {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            adx_threshold: config.adx_threshold,
            momentum_threshold: config.momentum_threshold,
            sideways_position: config.sideways_position,
            trend_position: config.trend_position,
        }
    }

    pub fn market_condition(
        &self,
        adx: f64,
        momentum: f64,
        plus_di: f64,
        minus_di: f64,
    ) -> MarketCondition {
        let threshold = self.momentum_threshold;

        if adx < self.adx_threshold && momentum > -threshold && momentum < threshold {
            MarketCondition::Sideways
        } else if plus_di > minus_di && momentum >= threshold {
            MarketCondition::Upward
        } else if plus_di < minus_di && momentum <= -threshold {
            MarketCondition::Downward
        } else {
            MarketCondition::Unclassified
        }
    }

    pub fn classify(&self, snapshot: &IndicatorSnapshot) -> Signal {
        let hold = |market_condition| Signal {
            market_condition,
            action: Action::Hold,
            position_size: 0.0,
            label: NEUTRAL.to_string(),
            close_price: snapshot.close,
            lower_band: snapshot.lower_band,
            upper_band: snapshot.upper_band,
            timestamp: snapshot.timestamp,
        };

        let (
            Some(adx),
            Some(momentum),
            Some(plus_di),
            Some(minus_di),
            Some(close),
            Some(lower),
            Some(upper),
        ) = (
            snapshot.adx,
            snapshot.momentum,
            snapshot.plus_di,
            snapshot.minus_di,
            snapshot.close,
            snapshot.lower_band,
            snapshot.upper_band,
        )
        else {
            debug!("Undefined indicators, forcing hold");
            return hold(MarketCondition::Unclassified);
        };

        let condition = self.market_condition(adx, momentum, plus_di, minus_di);

        let decision = match condition {
            MarketCondition::Sideways if close < lower => {
                Some((Action::Buy, self.sideways_position, SIDEWAYS_OVERSOLD))
            }
            MarketCondition::Sideways if close > upper => {
                Some((Action::Sell, self.sideways_position, SIDEWAYS_OVERBOUGHT))
            }
            // Sells into a breakdown as well; kept pending product confirmation.
            MarketCondition::Downward if close < lower => {
                Some((Action::Sell, self.trend_position, OVERBOUGHT))
            }
            MarketCondition::Upward if close > upper => {
                Some((Action::Sell, self.trend_position, OVERBOUGHT))
            }
            _ => None,
        };

        let signal = match decision {
            Some((action, position_size, label)) => Signal {
                market_condition: condition,
                action,
                position_size,
                label: label.to_string(),
                close_price: Some(close),
                lower_band: Some(lower),
                upper_band: Some(upper),
                timestamp: snapshot.timestamp,
            },
            None => hold(condition),
        };

        debug!(
            "adx={:.2} mom={:.2} +di={:.2} -di={:.2} -> {} / {}",
            adx, momentum, plus_di, minus_di, signal.market_condition, signal.action
        );
        signal
    }
}
