use ta::indicators::TrueRange;
use ta::{Close, High, Low, Next, Reset};

use crate::error::StrategyError;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DmiOutput {
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub adx: Option<f64>,
}

/// Wilder's directional movement system (+DI, -DI and ADX).
///
/// Seeded the same way TA-Lib does it: the first `period - 1` directional
/// movements and true ranges are summed, then every further bar is smoothed
/// with `s = s - s / period + x`. The DIs are defined from bar index `period`,
/// the ADX (mean of the first `period` DX values, then Wilder-smoothed) from
/// bar index `2 * period - 1`.
#[derive(Debug, Clone)]
pub struct DirectionalMovementIndex {
    period: usize,
    true_range: TrueRange,
    prev: Option<(f64, f64)>,
    index: usize,
    plus_dm: f64,
    minus_dm: f64,
    tr: f64,
    dx_sum: f64,
    adx: Option<f64>,
}

impl DirectionalMovementIndex {
    pub fn new(period: usize) -> Result<Self, StrategyError> {
        if period == 0 {
            return Err(StrategyError::InvalidParameter(
                "ADX period must be greater than 0".to_string(),
            ));
        }
        if period.checked_mul(2).is_none() {
            return Err(StrategyError::InvalidParameter(format!(
                "ADX period {} is too large",
                period
            )));
        }
        Ok(Self {
            period,
            true_range: TrueRange::new(),
            prev: None,
            index: 0,
            plus_dm: 0.0,
            minus_dm: 0.0,
            tr: 0.0,
            dx_sum: 0.0,
            adx: None,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl<T: High + Low + Close> Next<&T> for DirectionalMovementIndex {
    type Output = DmiOutput;

    fn next(&mut self, bar: &T) -> Self::Output {
        let tr = self.true_range.next(bar);
        let index = self.index;
        self.index += 1;

        let Some((prev_high, prev_low)) = self.prev.replace((bar.high(), bar.low())) else {
            return DmiOutput::default();
        };

        let up = bar.high() - prev_high;
        let down = prev_low - bar.low();
        let plus_dm = if up > 0.0 && up > down { up } else { 0.0 };
        let minus_dm = if down > 0.0 && down > up { down } else { 0.0 };

        if index < self.period {
            self.plus_dm += plus_dm;
            self.minus_dm += minus_dm;
            self.tr += tr;
            return DmiOutput::default();
        }

        let n = self.period as f64;
        self.plus_dm = self.plus_dm - self.plus_dm / n + plus_dm;
        self.minus_dm = self.minus_dm - self.minus_dm / n + minus_dm;
        self.tr = self.tr - self.tr / n + tr;

        let (plus_di, minus_di) = if self.tr > 0.0 {
            (100.0 * self.plus_dm / self.tr, 100.0 * self.minus_dm / self.tr)
        } else {
            (0.0, 0.0)
        };

        let di_sum = plus_di + minus_di;
        let dx = if di_sum > 0.0 {
            100.0 * (plus_di - minus_di).abs() / di_sum
        } else {
            0.0
        };

        let last_seed = 2 * self.period - 1;
        self.adx = match self.adx {
            Some(prev) => Some((prev * (n - 1.0) + dx) / n),
            None => {
                self.dx_sum += dx;
                (index == last_seed).then_some(self.dx_sum / n)
            }
        };

        DmiOutput {
            plus_di: Some(plus_di),
            minus_di: Some(minus_di),
            adx: self.adx,
        }
    }
}

impl Reset for DirectionalMovementIndex {
    fn reset(&mut self) {
        self.true_range.reset();
        self.prev = None;
        self.index = 0;
        self.plus_dm = 0.0;
        self.minus_dm = 0.0;
        self.tr = 0.0;
        self.dx_sum = 0.0;
        self.adx = None;
    }
}
