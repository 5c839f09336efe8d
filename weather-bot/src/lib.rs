//! # weather-bot
//!
//! Long-poll update loop and dispatcher for the Telegram weather bot.
//!
//! - [`UpdateLoop`] pulls batches through a [`wbot_core::Messenger`], advances the [`Cursor`] and
//!   hands every event to the [`Dispatcher`] one at a time.
//! - [`Dispatcher`] routes commands, button callbacks and free text, keeping per-user
//!   [`ConversationState`] in [`UserStates`].
//! - Cities persist through [`storage::CityStore`]; forecasts come from a
//!   [`forecast_client::ForecastProvider`].

pub mod cli;
pub mod components;
pub mod config;
pub mod cursor;
pub mod dispatcher;
pub mod keyboards;
pub mod messages;
pub mod runner;
pub mod state;
pub mod update_loop;

pub use cli::{Cli, Commands};
pub use components::{build_components, BotComponents};
pub use config::BotConfig;
pub use cursor::Cursor;
pub use dispatcher::Dispatcher;
pub use runner::{build_update_loop, run_bot};
pub use state::{ConversationState, UserStates};
pub use update_loop::{BatchOutcome, LoopSettings, UpdateLoop};
