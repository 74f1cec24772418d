use async_trait::async_trait;
use common::config::TelegramConfig;
use reqwest::Url;
use teloxide::RequestError;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::debug;

use crate::services::notifier::{NotifyError, Notifier};

pub struct TelegramService {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramService {
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let mut bot = Bot::new(&config.bot_token);
        if let Some(api_url) = &config.api_url {
            let url = Url::parse(api_url)
                .map_err(|e| NotifyError::InvalidApiUrl(format!("{}: {}", api_url, e)))?;
            debug!("Using Telegram API at {}", url);
            bot = bot.set_api_url(url);
        }

        Ok(Self {
            bot,
            chat_id: ChatId(config.chat_id),
        })
    }
}

#[async_trait]
impl Notifier for TelegramService {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        // Alerts are written for legacy Markdown; MarkdownV2 would need every `.` and `(` escaped
        #[allow(deprecated)]
        let parse_mode = ParseMode::Markdown;

        let result = self
            .bot
            .send_message(self.chat_id, message)
            .parse_mode(parse_mode)
            .await;

        match result {
            Ok(sent) => {
                debug!("Telegram message {:?} delivered", sent.id);
                Ok(())
            }
            // The Bot API answered with `ok: false`
            Err(RequestError::Api(api_error)) => Err(NotifyError::Rejected(api_error.to_string())),
            Err(e) => Err(NotifyError::Transport(e)),
        }
    }
}
