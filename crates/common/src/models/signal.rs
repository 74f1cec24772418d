use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketCondition {
    Sideways,
    Upward,
    Downward,
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sideways => "Sideways",
            Self::Upward => "Upward",
            Self::Downward => "Downward",
            Self::Unclassified => "Unclassified",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Hold => "Hold",
        };
        f.write_str(name)
    }
}

/// Outcome of classifying the latest indicator values for one symbol.
///
/// Price fields are `None` when the window was too short to define them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub market_condition: MarketCondition,
    pub action: Action,
    pub position_size: f64, // 0.0, 0.05 or 0.10
    pub label: String,
    pub close_price: Option<f64>,
    pub lower_band: Option<f64>,
    pub upper_band: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}
