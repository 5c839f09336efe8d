//! # wbot-core
//!
//! Core types and traits for the weather bot: [`Messenger`], [`InboundEvent`], [`Keyboard`],
//! error types and tracing initialization. Transport-agnostic; used by wbot-telegram and weather-bot.

pub mod error;
pub mod logger;
pub mod messenger;
pub mod types;

pub use error::{Result, WbotError};
pub use logger::init_tracing;
pub use messenger::Messenger;
pub use types::{Button, InboundEvent, Keyboard, KeyboardKind, Update};
