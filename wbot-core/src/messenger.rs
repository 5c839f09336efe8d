//! Messaging abstraction: pull events, push replies.
//!
//! [`Messenger`] is transport-agnostic; `wbot_telegram::TelegramMessenger` implements it via teloxide
//! and tests substitute a recording mock.

use crate::error::Result;
use crate::types::{Keyboard, Update};
use async_trait::async_trait;

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Long-polls for updates with id >= `offset`, waiting at most `timeout_secs`.
    /// Returns an empty vec on no activity or on a failed/malformed response; never errors.
    async fn get_updates(&self, offset: i64, timeout_secs: u32) -> Vec<Update>;

    /// Sends `text` to `chat_id`, optionally with a keyboard.
    async fn send_message(&self, chat_id: i64, text: &str, keyboard: Option<&Keyboard>)
        -> Result<()>;

    /// Acknowledges a button press, optionally showing `text` as a toast.
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}
