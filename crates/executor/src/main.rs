use dotenvy::dotenv;
use tracing::{debug, info, warn};

use common::config::AppConfig;
use common::logger;
use market_data::BinanceClient;

use crate::services::notifier::{LogNotifier, Notifier};
use crate::services::signal_service::{SignalService, SymbolOutcome};
use crate::services::telegram_service::TelegramService;

mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("System starting up...");

    let config = AppConfig::from_env()?;
    info!(
        "Symbols: {:?}, interval: {}, window: {} klines",
        config.symbols, config.interval, config.limit
    );

    let min_klines = config.strategy.min_klines();
    if config.limit < min_klines {
        warn!(
            "KLINE_LIMIT={} is below the {} klines the indicators need; every symbol will be skipped",
            config.limit, min_klines
        );
    }

    let provider = BinanceClient::new(&config.base_url)?;
    let notifier: Box<dyn Notifier> = match &config.telegram {
        Some(telegram) => Box::new(TelegramService::new(telegram)?),
        None => {
            warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set, alerts will only be logged");
            Box::new(LogNotifier)
        }
    };

    let service = SignalService::new(&config, Box::new(provider), notifier)?;
    let reports = service.run(&config.symbols).await;

    let notified = reports
        .iter()
        .filter(|r| matches!(r.outcome, SymbolOutcome::Notified(_)))
        .count();
    let skipped = reports
        .iter()
        .filter(|r| matches!(r.outcome, SymbolOutcome::DataUnavailable(_)))
        .count();
    info!(
        "Run complete: {} notified, {} failed to notify, {} skipped",
        notified,
        reports.len() - notified - skipped,
        skipped
    );

    Ok(())
}
