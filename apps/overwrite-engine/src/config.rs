//! Configuration for the overwrite engine.
//!
//! Loaded from YAML with `${VAR}` / `${VAR:-default}` interpolation, or
//! assembled from environment variables alone when no file is given.
//!
//! # Usage
//!
//! ```rust,ignore
//! use overwrite_engine::config::load_config;
//!
//! let config = load_config(Some("config.yaml"))?;
//! let params = config.overwrite_params();
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::use_cases::OverwriteParams;
use crate::domain::option_selection::{
    CandidateOrdering, ContractType, DEFAULT_MAX_DAYS, DEFAULT_MIN_DAYS, DEFAULT_STRIKE_MARGIN,
    EligibilityFilter,
};
use crate::domain::order_execution::{OrderStyle, TimeInForce};
use crate::domain::risk_management::MAX_OPTIONS_LEVEL;
use crate::infrastructure::broker::alpaca::{AlpacaConfig, AlpacaEnvironment, RetryConfig};
use crate::observability::MetricsConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Broker connection.
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Contract selection and order shape.
    pub strategy: StrategyConfig,
    /// Options level gate.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Logging and metrics.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Alpaca connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// API secret.
    #[serde(default)]
    pub api_secret: String,
    /// PAPER or LIVE.
    #[serde(default)]
    pub environment: AlpacaEnvironment,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retry policy.
    #[serde(default)]
    pub retry: RetrySettings,
    /// Trading API URL override.
    #[serde(default)]
    pub trading_url: Option<String>,
    /// Data API URL override.
    #[serde(default)]
    pub data_url: Option<String>,
    /// Trade updates stream URL override.
    #[serde(default)]
    pub stream_url: Option<String>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            environment: AlpacaEnvironment::default(),
            timeout_secs: default_timeout_secs(),
            retry: RetrySettings::default(),
            trading_url: None,
            data_url: None,
            stream_url: None,
        }
    }
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Retry settings in config units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Attempts including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// First backoff in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Backoff cap in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Backoff multiplier.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Jitter fraction.
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            multiplier: default_multiplier(),
            jitter: default_jitter(),
        }
    }
}

const fn default_max_attempts() -> u32 {
    3
}
const fn default_initial_backoff_ms() -> u64 {
    100
}
const fn default_max_backoff_ms() -> u64 {
    10_000
}
const fn default_multiplier() -> f64 {
    2.0
}
const fn default_jitter() -> f64 {
    0.1
}

/// Contract selection and order settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Underlying ticker.
    pub underlying: String,
    /// Window lower bound in days.
    #[serde(default = "default_min_days")]
    pub min_days: u32,
    /// Window upper bound in days.
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    /// Out-of-the-money margin.
    #[serde(default = "default_strike_margin")]
    pub strike_margin: Decimal,
    /// Contract type.
    #[serde(default)]
    pub contract_type: ContractType,
    /// Candidate ranking.
    #[serde(default)]
    pub ordering: CandidateOrdering,
    /// Contracts written per run at most.
    #[serde(default = "default_max_contracts")]
    pub max_contracts: u32,
    /// Market or limit at bid.
    #[serde(default)]
    pub order_style: OrderStyle,
    /// Time in force.
    #[serde(default)]
    pub time_in_force: TimeInForce,
    /// Submit orders instead of a dry run.
    #[serde(default)]
    pub execute: bool,
    /// Seconds to follow a submitted order's updates; 0 disables.
    #[serde(default = "default_follow_updates_secs")]
    pub follow_updates_secs: u64,
}

const fn default_min_days() -> u32 {
    DEFAULT_MIN_DAYS
}
const fn default_max_days() -> u32 {
    DEFAULT_MAX_DAYS
}
const fn default_strike_margin() -> Decimal {
    DEFAULT_STRIKE_MARGIN
}
const fn default_max_contracts() -> u32 {
    1
}
const fn default_follow_updates_secs() -> u64 {
    30
}

/// Options level gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Level the run asks for.
    #[serde(default = "default_level")]
    pub desired_level: u8,
    /// Highest level policy allows.
    #[serde(default = "default_level")]
    pub policy_ceiling: u8,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            desired_level: default_level(),
            policy_ceiling: default_level(),
        }
    }
}

const fn default_level() -> u8 {
    1
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Prometheus exporter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Start the exporter.
    #[serde(default)]
    pub enabled: bool,
    /// Listener address.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:9090".to_string()
}

impl Config {
    /// Parameters for one overwrite run.
    #[must_use]
    pub fn overwrite_params(&self) -> OverwriteParams {
        let strategy = &self.strategy;
        OverwriteParams {
            filter: EligibilityFilter {
                min_days: strategy.min_days,
                max_days: strategy.max_days,
                strike_margin: strategy.strike_margin,
                contract_type: strategy.contract_type,
                ordering: strategy.ordering,
            },
            desired_level: self.risk.desired_level,
            policy_ceiling: self.risk.policy_ceiling,
            max_contracts: strategy.max_contracts,
            order_style: strategy.order_style,
            time_in_force: strategy.time_in_force,
            execute: strategy.execute,
            follow_updates: (strategy.follow_updates_secs > 0)
                .then(|| Duration::from_secs(strategy.follow_updates_secs)),
            ..OverwriteParams::new(strategy.underlying.trim().to_uppercase())
        }
    }

    /// Alpaca adapter configuration.
    #[must_use]
    pub fn alpaca_config(&self) -> AlpacaConfig {
        let broker = &self.broker;
        let retry = &broker.retry;
        AlpacaConfig {
            trading_url: broker.trading_url.clone(),
            data_url: broker.data_url.clone(),
            stream_url: broker.stream_url.clone(),
            ..AlpacaConfig::new(&broker.api_key, &broker.api_secret, broker.environment)
                .with_timeout(Duration::from_secs(broker.timeout_secs))
                .with_retry(RetryConfig {
                    max_attempts: retry.max_attempts,
                    initial_backoff: Duration::from_millis(retry.initial_backoff_ms),
                    max_backoff: Duration::from_millis(retry.max_backoff_ms),
                    multiplier: retry.multiplier,
                    jitter: retry.jitter,
                })
        }
    }

    /// Prometheus exporter configuration, when enabled.
    pub fn metrics_config(&self) -> Result<Option<MetricsConfig>, ConfigError> {
        let metrics = &self.observability.metrics;
        if !metrics.enabled {
            return Ok(None);
        }
        let listen_addr: SocketAddr = metrics.listen_addr.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "observability.metrics.listen_addr '{}' is not a socket address",
                metrics.listen_addr
            ))
        })?;
        Ok(Some(MetricsConfig { listen_addr }))
    }

    /// Fail unless broker credentials are present.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if self.broker.api_key.is_empty() {
            return Err(ConfigError::MissingEnvVar("ALPACA_KEY".to_string()));
        }
        if self.broker.api_secret.is_empty() {
            return Err(ConfigError::MissingEnvVar("ALPACA_SECRET".to_string()));
        }
        Ok(())
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Configuration used when no file is given.
const ENV_TEMPLATE: &str = r#"
broker:
  api_key: "${ALPACA_KEY}"
  api_secret: "${ALPACA_SECRET}"
  environment: "${OVERWRITE_ENV:-PAPER}"
strategy:
  underlying: "${OVERWRITE_UNDERLYING}"
  min_days: ${OVERWRITE_MIN_DAYS:-14}
  max_days: ${OVERWRITE_MAX_DAYS:-90}
  strike_margin: "${OVERWRITE_STRIKE_MARGIN:-0.02}"
  max_contracts: ${OVERWRITE_MAX_CONTRACTS:-1}
  order_style: "${OVERWRITE_ORDER_STYLE:-market}"
  execute: ${OVERWRITE_EXECUTE:-false}
  follow_updates_secs: ${OVERWRITE_FOLLOW_UPDATES_SECS:-30}
risk:
  desired_level: ${OVERWRITE_DESIRED_LEVEL:-1}
  policy_ceiling: ${OVERWRITE_POLICY_CEILING:-1}
observability:
  logging:
    level: "${LOG_LEVEL:-info}"
    format: "${LOG_FORMAT:-pretty}"
  metrics:
    enabled: ${METRICS_ENABLED:-false}
    listen_addr: "${METRICS_LISTEN_ADDR:-0.0.0.0:9090}"
"#;

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Build configuration from environment variables alone.
///
/// Reads `ALPACA_KEY`, `ALPACA_SECRET`, `OVERWRITE_ENV`, `OVERWRITE_UNDERLYING`
/// and the optional `OVERWRITE_*`, `LOG_*` and `METRICS_*` overrides.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    load_config_from_string(ENV_TEMPLATE)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let strategy = &config.strategy;

    if strategy.underlying.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "strategy.underlying must not be empty".to_string(),
        ));
    }

    if strategy.min_days >= strategy.max_days {
        return Err(ConfigError::ValidationError(format!(
            "strategy.min_days ({}) must be less than strategy.max_days ({})",
            strategy.min_days, strategy.max_days
        )));
    }

    if strategy.strike_margin.is_sign_negative() {
        return Err(ConfigError::ValidationError(
            "strategy.strike_margin must not be negative".to_string(),
        ));
    }

    if strategy.max_contracts == 0 {
        return Err(ConfigError::ValidationError(
            "strategy.max_contracts must be at least 1".to_string(),
        ));
    }

    for (field, level) in [
        ("risk.desired_level", config.risk.desired_level),
        ("risk.policy_ceiling", config.risk.policy_ceiling),
    ] {
        if level > MAX_OPTIONS_LEVEL {
            return Err(ConfigError::ValidationError(format!(
                "{field} must be between 0 and {MAX_OPTIONS_LEVEL}"
            )));
        }
    }

    let retry = &config.broker.retry;
    if retry.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "broker.retry.max_attempts must be at least 1".to_string(),
        ));
    }
    if retry.multiplier < 1.0 || !(0.0..=1.0).contains(&retry.jitter) {
        return Err(ConfigError::ValidationError(
            "broker.retry.multiplier must be >= 1.0 and jitter between 0.0 and 1.0".to_string(),
        ));
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    config.metrics_config()?;

    Ok(())
}
