//! Kizuna CLI - Build an episode relationship dataset from synopses.

use anyhow::Context;
use clap::Parser;
use kizuna_cli::commands;
use kizuna_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Pick up QWEN_API_KEY and friends from a local .env, if any
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    // Determine summary format
    let format = cli
        .summary_format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => {
            let input = args.input.clone();
            commands::execute_run(args, &config, &formatter)
                .await
                .with_context(|| format!("Run over {} failed", input.display()))?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
        Command::Taxonomy => {
            commands::execute_taxonomy(&formatter)?;
        }
    }

    Ok(())
}

/// Log to stderr; `--log-level` wins over `RUST_LOG`, which wins over "info"
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
