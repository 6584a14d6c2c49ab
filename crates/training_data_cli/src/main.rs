use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use training_data::Config;

mod commands;
mod logging;

use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "training-data")]
#[command(about = "Collect Persian prompt/completion pairs and export them for fine-tuning")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// SQLite database path (overrides config and TRAINING_DB_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true, default_value_t = false)]
    debug: bool,

    /// Append log records to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Request completions for prompts and store the accepted pairs
    Collect {
        /// Prompts to submit
        prompts: Vec<String>,

        /// Read additional prompts from a file, one per line
        #[arg(long)]
        prompts_file: Option<PathBuf>,

        /// Export the training file after collecting
        #[arg(long, default_value_t = false)]
        export: bool,

        /// Export destination (defaults to the configured export path)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write every stored pair to the JSON training file
    Export {
        /// Export destination (defaults to the configured export path)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show how many training examples are stored
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    let log_file = cli.log_file.or_else(|| config.log_file.clone());
    init_logging(cli.debug, log_file.as_deref())?;

    log::debug!("Database: {}", config.database_path.display());
    log::debug!("API base: {}", config.api_base);

    match cli.command {
        Commands::Collect {
            prompts,
            prompts_file,
            export,
            output,
        } => commands::collect(&config, prompts, prompts_file, export, output).await,
        Commands::Export { output } => commands::export(&config, output),
        Commands::Stats => commands::stats(&config),
    }
}
