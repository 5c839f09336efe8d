//! weather-bot binary: loads config from env (and `.env`), then runs the update loop until Ctrl-C.

use anyhow::Result;
use clap::Parser;
use weather_bot::{run_bot, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
    }
}
