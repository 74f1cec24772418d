use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification rejected by provider: {0}")]
    Rejected(String),
    #[error("Invalid Telegram API URL {0}")]
    InvalidApiUrl(String),
    #[error("Notification transport failed: {0}")]
    Transport(#[from] teloxide::RequestError),
}

/// Delivers a formatted alert. Failures are reported, never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Used when no Telegram credentials are configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        info!("Telegram disabled, alert not delivered:\n{}", message);
        Ok(())
    }
}
