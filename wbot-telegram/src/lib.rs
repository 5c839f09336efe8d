//! # wbot-telegram
//!
//! Telegram transport layer: [`TelegramMessenger`] implements [`wbot_core::Messenger`] on top of
//! teloxide's raw Bot API requests (`getUpdates`, `sendMessage`, `answerCallbackQuery`), plus
//! adapters from teloxide types to core types and a minimal config.
//! The offset cursor is owned by the caller; this crate never polls on its own.

mod adapters;
mod config;
mod messenger;

pub use adapters::{to_reply_markup, TelegramUpdateWrapper};
pub use config::TelegramConfig;
pub use messenger::TelegramMessenger;
