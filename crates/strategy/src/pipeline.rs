use chrono::{DateTime, Utc};
use common::config::StrategyConfig;
use common::models::Kline;
use ta::indicators::BollingerBands;
use ta::{Close, Next};
use tracing::debug;

use crate::error::StrategyError;
use crate::indicators::{DirectionalMovementIndex, Momentum};

/// Indicator values at the last kline of a window. `None` means undefined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub momentum: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub close: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl IndicatorSnapshot {
    pub fn is_complete(&self) -> bool {
        [
            self.momentum,
            self.adx,
            self.plus_di,
            self.minus_di,
            self.upper_band,
            self.lower_band,
            self.close,
        ]
        .iter()
        .all(Option::is_some)
    }
}

/// Runs momentum, DMI/ADX and Bollinger bands over a kline window.
///
/// The indicators are validated once at construction and cloned fresh for
/// every `compute` call, so one pipeline serves any number of symbols.
#[derive(Debug, Clone)]
pub struct IndicatorPipeline {
    momentum: Momentum,
    dmi: DirectionalMovementIndex,
    bands: BollingerBands,
    band_period: usize,
    min_klines: usize,
}

impl IndicatorPipeline {
    pub fn new(config: &StrategyConfig) -> Result<Self, StrategyError> {
        let bands = BollingerBands::new(config.band_period, config.band_multiplier)
            .map_err(|e| StrategyError::InvalidParameter(format!("bollinger bands: {:?}", e)))?;
        if !(config.band_multiplier.is_finite() && config.band_multiplier > 0.0) {
            return Err(StrategyError::InvalidParameter(format!(
                "band multiplier must be positive, got {}",
                config.band_multiplier
            )));
        }

        Ok(Self {
            momentum: Momentum::new(config.momentum_period)?,
            dmi: DirectionalMovementIndex::new(config.adx_period)?,
            bands,
            band_period: config.band_period,
            min_klines: config.min_klines(),
        })
    }

    /// Number of klines needed before every snapshot field is defined.
    pub fn min_klines(&self) -> usize {
        self.min_klines
    }

    pub fn compute(&self, klines: &[Kline]) -> IndicatorSnapshot {
        let mut momentum = self.momentum.clone();
        let mut dmi = self.dmi.clone();
        let mut bands = self.bands.clone();

        let mut snapshot = IndicatorSnapshot::default();
        for (seen, kline) in klines.iter().enumerate() {
            let close = kline.close();
            let dmi_out = dmi.next(kline);
            let band_out = bands.next(close);

            snapshot.momentum = momentum.next(close);
            snapshot.adx = dmi_out.adx;
            snapshot.plus_di = dmi_out.plus_di;
            snapshot.minus_di = dmi_out.minus_di;
            if seen + 1 >= self.band_period {
                snapshot.upper_band = Some(band_out.upper);
                snapshot.lower_band = Some(band_out.lower);
            }
            snapshot.close = Some(close);
            snapshot.timestamp = Some(kline.open_time);
        }

        let snapshot = IndicatorSnapshot {
            momentum: finite(snapshot.momentum),
            adx: finite(snapshot.adx),
            plus_di: finite(snapshot.plus_di),
            minus_di: finite(snapshot.minus_di),
            upper_band: finite(snapshot.upper_band),
            lower_band: finite(snapshot.lower_band),
            close: finite(snapshot.close),
            timestamp: snapshot.timestamp,
        };

        if !snapshot.is_complete() {
            debug!(
                "Incomplete indicators over {} klines (need {}): {:?}",
                klines.len(),
                self.min_klines,
                snapshot
            );
        }
        snapshot
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kline(i: usize, close: f64) -> Kline {
        Kline {
            open_time: DateTime::from_timestamp_millis(1_700_000_000_000 + i as i64 * 900_000)
                .unwrap(),
            open_price: close,
            high_price: close + 1.0,
            low_price: close - 1.0,
            close_price: close,
            volume: 10.0,
        }
    }

    fn trending(len: usize) -> Vec<Kline> {
        (0..len).map(|i| kline(i, 1000.0 + 20.0 * i as f64)).collect()
    }

    #[test]
    fn test_empty_window_is_undefined() {
        let pipeline = IndicatorPipeline::new(&StrategyConfig::default()).unwrap();
        let snapshot = pipeline.compute(&[]);

        assert_eq!(snapshot, IndicatorSnapshot::default());
        assert!(!snapshot.is_complete());
    }

    #[test]
    fn test_short_window_leaves_adx_undefined() {
        let pipeline = IndicatorPipeline::new(&StrategyConfig::default()).unwrap();
        assert_eq!(pipeline.min_klines(), 144);

        let snapshot = pipeline.compute(&trending(143));
        assert!(snapshot.adx.is_none());
        assert!(snapshot.momentum.is_some());
        assert!(snapshot.upper_band.is_some());
        assert!(!snapshot.is_complete());

        let snapshot = pipeline.compute(&trending(10));
        assert!(snapshot.momentum.is_none());
        assert!(snapshot.upper_band.is_none());
        assert!(snapshot.plus_di.is_none());
        assert_eq!(snapshot.close, Some(1180.0));
    }

    #[test]
    fn test_full_window_is_complete() {
        let pipeline = IndicatorPipeline::new(&StrategyConfig::default()).unwrap();
        let klines = trending(200);
        let snapshot = pipeline.compute(&klines);

        assert!(snapshot.is_complete());
        assert_eq!(snapshot.momentum, Some(20.0 * 14.0));
        assert_eq!(snapshot.close, Some(klines[199].close_price));
        assert_eq!(snapshot.timestamp, Some(klines[199].open_time));
        assert!(snapshot.plus_di.unwrap() > snapshot.minus_di.unwrap());
        assert!(snapshot.upper_band.unwrap() > snapshot.lower_band.unwrap());
    }

    #[test]
    fn test_compute_is_repeatable() {
        let pipeline = IndicatorPipeline::new(&StrategyConfig::default()).unwrap();
        let klines = trending(180);
        assert_eq!(pipeline.compute(&klines), pipeline.compute(&klines));
    }

    #[test]
    fn test_bands_use_population_deviation() {
        let config = StrategyConfig {
            adx_period: 2,
            ..StrategyConfig::default()
        };
        let pipeline = IndicatorPipeline::new(&config).unwrap();
        let klines: Vec<Kline> = (1..=20).map(|i| kline(i, i as f64)).collect();
        let snapshot = pipeline.compute(&klines);

        let deviation = (399.0_f64 / 12.0).sqrt();
        assert!((snapshot.upper_band.unwrap() - (10.5 + 2.0 * deviation)).abs() < 1e-9);
        assert!((snapshot.lower_band.unwrap() - (10.5 - 2.0 * deviation)).abs() < 1e-9);
    }

    #[test]
    fn test_flat_prices_have_zero_momentum_and_collapsed_bands() {
        let pipeline = IndicatorPipeline::new(&StrategyConfig::default()).unwrap();
        let klines: Vec<Kline> = (0..150).map(|i| kline(i, 250.0)).collect();
        let snapshot = pipeline.compute(&klines);

        assert_eq!(snapshot.momentum, Some(0.0));
        assert_eq!(snapshot.adx, Some(0.0));
        assert!((snapshot.upper_band.unwrap() - 250.0).abs() < 1e-9);
        assert!((snapshot.lower_band.unwrap() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_parameters() {
        let zero_band = StrategyConfig {
            band_period: 0,
            ..StrategyConfig::default()
        };
        assert!(IndicatorPipeline::new(&zero_band).is_err());

        let zero_momentum = StrategyConfig {
            momentum_period: 0,
            ..StrategyConfig::default()
        };
        assert!(IndicatorPipeline::new(&zero_momentum).is_err());

        let negative = StrategyConfig {
            band_multiplier: -2.0,
            ..StrategyConfig::default()
        };
        assert!(IndicatorPipeline::new(&negative).is_err());
    }
}
