//! Wraps teloxide::Bot and implements [`wbot_core::Messenger`]. Production code talks to the
//! Telegram Bot API; tests point `telegram_api_url` at a mock server or substitute another impl.

use crate::adapters::{to_reply_markup, TelegramUpdateWrapper};
use crate::config::TelegramConfig;
use async_trait::async_trait;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{AllowedUpdate, CallbackQueryId, ChatId};
use tracing::{debug, info, warn};
use wbot_core::{Keyboard, Messenger, Result, Update, WbotError};

pub struct TelegramMessenger {
    bot: teloxide::Bot,
    error_backoff: Duration,
}

impl TelegramMessenger {
    /// Builds the bot client. Every request is bounded by `config.request_timeout`.
    pub fn new(config: &TelegramConfig) -> anyhow::Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(config.request_timeout)
            .build()?;
        let mut bot = teloxide::Bot::with_client(config.bot_token.clone(), client);
        if let Some(url) = config.api_url()? {
            bot = bot.set_api_url(url);
        }
        Ok(Self {
            bot,
            error_backoff: config.error_backoff,
        })
    }

    /// Username of the bot account, if it has one. Used as a startup token check.
    pub async fn get_me(&self) -> Result<Option<String>> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| WbotError::Messaging(e.to_string()))?;
        Ok(me.user.username.clone())
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn get_updates(&self, offset: i64, timeout_secs: u32) -> Vec<Update> {
        let offset = match i32::try_from(offset) {
            Ok(offset) => offset,
            Err(_) => {
                warn!(offset, "Update offset out of range for the Bot API");
                return Vec::new();
            }
        };

        let result = self
            .bot
            .get_updates()
            .offset(offset)
            .timeout(timeout_secs)
            .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery])
            .await;

        match result {
            Ok(updates) => {
                if !updates.is_empty() {
                    debug!(count = updates.len(), offset, "Received updates");
                }
                updates
                    .iter()
                    .map(|u| TelegramUpdateWrapper(u).to_core())
                    .collect()
            }
            Err(e) => {
                warn!(error = %e, offset, "getUpdates failed, backing off");
                tokio::time::sleep(self.error_backoff).await;
                Vec::new()
            }
        }
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_reply_markup(keyboard));
        }
        request
            .await
            .map_err(|e| WbotError::Messaging(e.to_string()))?;
        info!(chat_id, "Message sent");
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()));
        if let Some(text) = text {
            request = request.text(text);
        }
        request
            .await
            .map_err(|e| WbotError::Messaging(e.to_string()))?;
        debug!(callback_id, "Callback answered");
        Ok(())
    }
}
