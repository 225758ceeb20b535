//! Overwrite Engine Binary
//!
//! Runs one covered-call overwrite for the configured underlying.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin overwrite-engine -- config.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `OVERWRITE_CONFIG`: Config file path when no argument is given
//! - `ALPACA_KEY` / `ALPACA_SECRET`: Broker credentials
//! - `OVERWRITE_ENV`: PAPER | LIVE (default: PAPER)
//! - `OVERWRITE_UNDERLYING`: Underlying when running without a config file
//! - `RUST_LOG`: Overrides the configured log level

use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use serde_json::json;

use overwrite_engine::application::ports::BrokerError;
use overwrite_engine::config::{Config, ConfigError, load_config, load_config_from_env};
use overwrite_engine::error::EngineError;
use overwrite_engine::infrastructure::config::Container;
use overwrite_engine::observability::init_metrics;
use overwrite_engine::telemetry::{LogFormat, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Install rustls crypto provider before any TLS operations
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = match load() {
        Ok(config) => config,
        Err(err) => {
            let err = EngineError::from(err);
            eprintln!("{err}");
            return Ok(exit_code(&err));
        }
    };

    let logging = &config.observability.logging;
    init_tracing(&logging.level, LogFormat::from_name(&logging.format));

    if let Some(metrics) = config.metrics_config()? {
        init_metrics(&metrics).context("failed to start metrics exporter")?;
    }

    match run(&config).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!(code = %err.code(), error = %err, "Overwrite engine failed");
            eprintln!("{err}");
            Ok(exit_code(&err))
        }
    }
}

/// Config from the first argument, `OVERWRITE_CONFIG`, or the environment.
fn load() -> Result<Config, ConfigError> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("OVERWRITE_CONFIG").ok());

    let config = match path.as_deref() {
        Some(path) => load_config(Some(path))?,
        None => load_config_from_env()?,
    };
    config.require_credentials()?;
    Ok(config)
}

async fn run(config: &Config) -> Result<serde_json::Value, EngineError> {
    let alpaca = config.alpaca_config();
    tracing::info!(
        environment = %alpaca.environment,
        underlying = %config.strategy.underlying,
        execute = config.strategy.execute,
        "Starting overwrite engine"
    );

    let container = Container::alpaca(&alpaca).map_err(BrokerError::from)?;

    let snapshot = container.inspect_account_use_case().execute().await?;

    let params = config.overwrite_params();
    if alpaca.environment.is_live() && params.execute {
        tracing::warn!(
            underlying = %params.underlying,
            "LIVE mode with execute enabled - orders will use real money"
        );
    }

    let today = Utc::now().date_naive();
    let report = container
        .run_overwrite_use_case()
        .execute(&params, today)
        .await
        .map_err(|err| EngineError::from(err).with_context("underlying", params.underlying.as_str()))?;

    tracing::info!(outcome = report.outcome.label(), "Overwrite run finished");

    Ok(json!({
        "account": snapshot,
        "report": report,
    }))
}

fn exit_code(err: &EngineError) -> ExitCode {
    u8::try_from(err.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}
