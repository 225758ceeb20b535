//! Alpaca adapter configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DATA_BASE_URL: &str = "https://data.alpaca.markets";

/// Environment for Alpaca API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlpacaEnvironment {
    /// Paper trading (simulated).
    #[default]
    #[serde(alias = "paper")]
    Paper,
    /// Live trading (real money).
    #[serde(alias = "live")]
    Live,
}

impl AlpacaEnvironment {
    /// Get the base URL for the trading API.
    #[must_use]
    pub const fn trading_base_url(&self) -> &'static str {
        match self {
            Self::Paper => "https://paper-api.alpaca.markets",
            Self::Live => "https://api.alpaca.markets",
        }
    }

    /// Trade updates WebSocket stream.
    #[must_use]
    pub const fn trade_stream_url(&self) -> &'static str {
        match self {
            Self::Paper => "wss://paper-api.alpaca.markets/stream",
            Self::Live => "wss://api.alpaca.markets/stream",
        }
    }

    /// Check if this is live trading.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

impl fmt::Display for AlpacaEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paper => write!(f, "PAPER"),
            Self::Live => write!(f, "LIVE"),
        }
    }
}

impl FromStr for AlpacaEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PAPER" => Ok(Self::Paper),
            "LIVE" => Ok(Self::Live),
            other => Err(format!("unknown Alpaca environment '{other}' (expected PAPER or LIVE)")),
        }
    }
}

/// Configuration for the Alpaca adapter.
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    /// API key.
    pub api_key: String,
    /// API secret.
    pub api_secret: String,
    /// Trading environment.
    pub environment: AlpacaEnvironment,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Retry policy configuration.
    pub retry: RetryConfig,
    /// Trading API URL override.
    pub trading_url: Option<String>,
    /// Data API URL override.
    pub data_url: Option<String>,
    /// Trade updates stream URL override.
    pub stream_url: Option<String>,
}

impl AlpacaConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        environment: AlpacaEnvironment,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            environment,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            trading_url: None,
            data_url: None,
            stream_url: None,
        }
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Point both APIs at other hosts (proxies, mock servers).
    #[must_use]
    pub fn with_base_urls(mut self, trading_url: impl Into<String>, data_url: impl Into<String>) -> Self {
        self.trading_url = Some(trading_url.into());
        self.data_url = Some(data_url.into());
        self
    }

    /// Point the trade updates stream at another host.
    #[must_use]
    pub fn with_stream_url(mut self, stream_url: impl Into<String>) -> Self {
        self.stream_url = Some(stream_url.into());
        self
    }

    /// Get the trading API base URL.
    #[must_use]
    pub fn trading_base_url(&self) -> &str {
        self.trading_url
            .as_deref()
            .unwrap_or_else(|| self.environment.trading_base_url())
            .trim_end_matches('/')
    }

    /// Get the data API base URL.
    #[must_use]
    pub fn data_base_url(&self) -> &str {
        self.data_url
            .as_deref()
            .unwrap_or(DATA_BASE_URL)
            .trim_end_matches('/')
    }

    /// Get the trade updates stream URL.
    #[must_use]
    pub fn trade_stream_url(&self) -> &str {
        self.stream_url
            .as_deref()
            .unwrap_or_else(|| self.environment.trade_stream_url())
    }
}

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
    /// Random extra delay as a fraction of each backoff (0.0 disables).
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn environment_urls() {
        assert!(AlpacaEnvironment::Paper.trading_base_url().contains("paper"));
        assert!(!AlpacaEnvironment::Live.trading_base_url().contains("paper"));
        assert!(AlpacaEnvironment::Live.is_live());
        assert_eq!(
            AlpacaEnvironment::Paper.trade_stream_url(),
            "wss://paper-api.alpaca.markets/stream"
        );
    }

    #[test]
    fn environment_parse() {
        assert_eq!("paper".parse::<AlpacaEnvironment>(), Ok(AlpacaEnvironment::Paper));
        assert_eq!(" LIVE ".parse::<AlpacaEnvironment>(), Ok(AlpacaEnvironment::Live));
        assert!("BACKTEST".parse::<AlpacaEnvironment>().is_err());
    }

    #[test]
    fn base_url_overrides() {
        let config = AlpacaConfig::new("key", "secret", AlpacaEnvironment::Live);
        assert_eq!(config.trading_base_url(), "https://api.alpaca.markets");
        assert_eq!(config.data_base_url(), "https://data.alpaca.markets");

        let config = config.with_base_urls("http://127.0.0.1:8080/", "http://127.0.0.1:8081");
        assert_eq!(config.trading_base_url(), "http://127.0.0.1:8080");
        assert_eq!(config.data_base_url(), "http://127.0.0.1:8081");
        assert_eq!(config.trade_stream_url(), "wss://api.alpaca.markets/stream");

        let config = config.with_stream_url("ws://127.0.0.1:8082/stream");
        assert_eq!(config.trade_stream_url(), "ws://127.0.0.1:8082/stream");
    }

    #[test]
    fn config_builders() {
        let config = AlpacaConfig::new("key", "secret", AlpacaEnvironment::Paper)
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryConfig {
                max_attempts: 5,
                ..RetryConfig::default()
            });
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn retry_config_default() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.initial_backoff, Duration::from_millis(100));
        assert_eq!(retry.multiplier, 2.0);
    }
}
