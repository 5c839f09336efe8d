//! Bot configuration loaded from the environment.

mod bot_config;

pub use bot_config::BotConfig;
