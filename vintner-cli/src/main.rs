//! Vintner CLI — run the training pipeline or serve predictions.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vintner_core::server::AppState;
use vintner_core::{PipelineConfig, Stage};

/// Vintner: wine-quality regression pipeline
#[derive(Parser, Debug)]
#[command(name = "vintner", version, about, long_about = None)]
struct Cli {
    /// Directory holding config.yaml, params.yaml, and schema.yaml
    #[arg(short, long, default_value = "config")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the full training pipeline
    Train,
    /// Run a single pipeline stage
    Stage {
        /// One of: ingestion, validation, transformation, training, evaluation
        name: String,
    },
    /// Serve the prediction web layer
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = PipelineConfig::load(&cli.config)
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;

    match cli.command {
        Commands::Train => {
            let metrics = vintner_core::run_training_pipeline(&config).await?;
            println!(
                "Training completed. rmse={:.4} mae={:.4} r2={:.4}",
                metrics.rmse, metrics.mae, metrics.r2
            );
        }
        Commands::Stage { name } => {
            let stage = Stage::parse(&name)
                .ok_or_else(|| anyhow::anyhow!("Unknown stage '{name}'"))?;
            vintner_core::run_stage(&config, stage).await?;
            println!("Stage {} completed", stage.name());
        }
        Commands::Serve { addr } => {
            let state = Arc::new(AppState::new(config));
            vintner_core::server::run(&addr, state).await?;
        }
    }

    Ok(())
}
