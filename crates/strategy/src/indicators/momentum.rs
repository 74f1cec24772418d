use std::collections::VecDeque;

use ta::{Next, Reset};

use crate::error::StrategyError;

/// Lagged first difference of the close: `close[t] - close[t - period]`.
#[derive(Debug, Clone)]
pub struct Momentum {
    period: usize,
    window: VecDeque<f64>,
}

impl Momentum {
    pub fn new(period: usize) -> Result<Self, StrategyError> {
        if period == 0 {
            return Err(StrategyError::InvalidParameter(
                "momentum period must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            period,
            window: VecDeque::with_capacity(period + 1),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Next<f64> for Momentum {
    type Output = Option<f64>;

    fn next(&mut self, close: f64) -> Self::Output {
        self.window.push_back(close);
        if self.window.len() > self.period + 1 {
            self.window.pop_front();
        }

        if self.window.len() == self.period + 1 {
            self.window.front().map(|lagged| close - lagged)
        } else {
            None
        }
    }
}

impl Reset for Momentum {
    fn reset(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentum_warmup_and_values() {
        let mut mom = Momentum::new(3).unwrap();
        assert_eq!(mom.next(10.0), None);
        assert_eq!(mom.next(11.0), None);
        assert_eq!(mom.next(12.0), None);
        // 15 - 10
        assert_eq!(mom.next(15.0), Some(5.0));
        // 9 - 11
        assert_eq!(mom.next(9.0), Some(-2.0));
    }

    #[test]
    fn test_momentum_reset() {
        let mut mom = Momentum::new(1).unwrap();
        mom.next(1.0);
        assert_eq!(mom.next(4.0), Some(3.0));

        mom.reset();
        assert_eq!(mom.next(2.0), None);
        assert_eq!(mom.next(2.5), Some(0.5));
    }

    #[test]
    fn test_momentum_zero_period() {
        assert!(Momentum::new(0).is_err());
    }
}
