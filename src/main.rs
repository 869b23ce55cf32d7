mod config;

use clap::{Parser, Subcommand};
use config::Configuration;

#[derive(Debug, Parser)]
#[clap(author, version)]
struct Arguments {
    #[clap(short = 'f', long = "filename")]
    config: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Start,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args: Arguments = Arguments::parse();
    let config = match Configuration::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(?err, "couldn't read config file");
            return;
        }
    };

    let bot = support_bot::Bot::new(config.into());

    let result = match args.command {
        Commands::Start => bot.start().await,
    };

    if let Err(reason) = result {
        tracing::error!(?reason, "finished unsuccessfully");
    }
}
