//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "weather-bot")]
#[command(about = "Telegram weather bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override TELEGRAM_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}
