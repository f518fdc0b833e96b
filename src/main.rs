//! Forecast cascade service.
//!
//! One binary, three tiers. The tier is picked on the command line:
//!
//! ```text
//!     Caller
//!       │  GET /weatherforecast
//!       ▼
//!   ┌───────────┐   retry + breaker   ┌─────────────┐   retry + breaker   ┌─────────┐
//!   │ converter │ ──────────────────▶ │ synthesizer │ ──────────────────▶ │ catalog │
//!   │  (5001)   │ ◀────────────────── │   (5003)    │ ◀────────────────── │ (5005)  │
//!   └───────────┘   records (°C)      └─────────────┘   category labels   └─────────┘
//!       │
//!       ▼  records (°F)
//!     Caller
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use forecast_cascade::config::{load_config, validate_for_tier, CascadeConfig, Tier};
use forecast_cascade::lifecycle::{signals, startup, Shutdown};
use forecast_cascade::observability::logging;

#[derive(Parser)]
#[command(name = "forecast-cascade")]
#[command(about = "Weather forecast cascade tier", long_about = None)]
struct Cli {
    /// Tier to run
    #[arg(value_enum)]
    tier: Tier,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override downstream.base_url
    #[arg(short, long)]
    downstream: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => CascadeConfig::default(),
    };

    if let Some(bind) = cli.bind {
        config.listener.bind_address = Some(bind);
    }
    if let Some(downstream) = cli.downstream {
        config.downstream.base_url = Some(downstream);
    }
    if let Err(errors) = validate_for_tier(&config, cli.tier) {
        for e in errors {
            eprintln!("Invalid configuration: {e}");
        }
        return ExitCode::FAILURE;
    }

    logging::init(&config.observability.log_level);
    tracing::info!(tier = %cli.tier, version = env!("CARGO_PKG_VERSION"), "forecast-cascade starting");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    if let Err(e) = startup::launch(cli.tier, config, &shutdown).await {
        tracing::error!(error = %e, "Startup failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
