use chrono::Utc;
use common::config::AppConfig;
use common::models::Signal;
use futures_util::stream::{self, StreamExt};
use market_data::KlineProvider;
use strategy::{IndicatorPipeline, SignalClassifier, StrategyError, format_alert};
use tracing::{error, info, warn};

use crate::services::notifier::Notifier;

const SEPARATOR: &str = "------------------------------------------------";

#[derive(Debug)]
pub enum SymbolOutcome {
    Notified(Signal),
    NotifyFailed(Signal),
    DataUnavailable(String),
}

#[derive(Debug)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: SymbolOutcome,
}

/// Fetch, compute, classify and notify, once per symbol.
pub struct SignalService {
    provider: Box<dyn KlineProvider>,
    notifier: Box<dyn Notifier>,
    pipeline: IndicatorPipeline,
    classifier: SignalClassifier,
    interval: String,
    limit: usize,
    max_concurrency: usize,
}

impl SignalService {
    pub fn new(
        config: &AppConfig,
        provider: Box<dyn KlineProvider>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self, StrategyError> {
        Ok(Self {
            provider,
            notifier,
            pipeline: IndicatorPipeline::new(&config.strategy)?,
            classifier: SignalClassifier::new(&config.strategy),
            interval: config.interval.clone(),
            limit: config.limit,
            max_concurrency: config.max_concurrency.max(1),
        })
    }

    pub async fn run(&self, symbols: &[String]) -> Vec<SymbolReport> {
        info!(
            "Computing signals for {} symbols ({} x {})",
            symbols.len(),
            self.limit,
            self.interval
        );

        if self.max_concurrency == 1 {
            let mut reports = Vec::with_capacity(symbols.len());
            for symbol in symbols {
                reports.push(self.process_symbol(symbol).await);
            }
            return reports;
        }

        stream::iter(symbols)
            .map(|symbol| self.process_symbol(symbol))
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await
    }

    pub async fn process_symbol(&self, symbol: &str) -> SymbolReport {
        let outcome = self.evaluate(symbol).await;
        SymbolReport {
            symbol: symbol.to_string(),
            outcome,
        }
    }

    async fn evaluate(&self, symbol: &str) -> SymbolOutcome {
        let klines = match self
            .provider
            .fetch_klines(symbol, &self.interval, self.limit)
            .await
        {
            Ok(klines) => klines,
            Err(e) => {
                warn!("Skipping {}: market data unavailable: {}", symbol, e);
                return SymbolOutcome::DataUnavailable(e.to_string());
            }
        };

        if klines.len() < self.pipeline.min_klines() {
            let reason = format!(
                "only {} klines, need {}",
                klines.len(),
                self.pipeline.min_klines()
            );
            warn!("Skipping {}: {}", symbol, reason);
            return SymbolOutcome::DataUnavailable(reason);
        }

        let snapshot = self.pipeline.compute(&klines);
        if !snapshot.is_complete() {
            warn!("Skipping {}: undefined indicators {:?}", symbol, snapshot);
            return SymbolOutcome::DataUnavailable("undefined indicators".to_string());
        }

        let signal = self.classifier.classify(&snapshot);
        let message = format_alert(symbol, &signal, Utc::now());
        println!("{}\n{}", message, SEPARATOR);

        match self.notifier.notify(&message).await {
            Ok(()) => {
                info!("{}: {} ({})", symbol, signal.action, signal.label);
                SymbolOutcome::Notified(signal)
            }
            Err(e) => {
                error!("Error sending notification for {}: {}", symbol, e);
                SymbolOutcome::NotifyFailed(signal)
            }
        }
    }
}
