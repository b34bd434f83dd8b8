//! Configuration management for setforge
//!
//! Settings are loaded from environment variables with sensible defaults.
//! Configuration covers the price ceiling, upstream pacing, the comparison
//! price markup and catalog client credentials.
//!
//! # Environment Variables
//!
//! - `SETFORGE_PRICE_CEILING`: max price for a single component - default: "1500.00"
//! - `SETFORGE_CREATE_DELAY_MS`: pause between component create calls - default: "500"
//! - `SETFORGE_MARKUP_PERCENT`: comparison price markup on the bundle - default: "20"
//! - `SETFORGE_CATALOG_ENDPOINT`: catalog API base URL - required for REST runs
//! - `SETFORGE_CATALOG_TOKEN`: catalog API access token - required for REST runs
//! - `SETFORGE_REQUEST_TIMEOUT`: upstream timeout in seconds - default: "30"
//! - `SETFORGE_LOG_LEVEL`: logging level - default: "info"

use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default values for configuration
const DEFAULT_PRICE_CEILING: &str = "1500.00";
const DEFAULT_CREATE_DELAY_MS: u64 = 500;
const DEFAULT_MARKUP_PERCENT: u32 = 20;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric or decimal value could not be parsed
    #[error("Failed to parse {key}: {value}")]
    ParseFailed { key: String, value: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Catalog endpoint or token missing for a REST run
    #[error("Catalog credentials missing. Set SETFORGE_CATALOG_ENDPOINT and SETFORGE_CATALOG_TOKEN")]
    MissingCredentials,
}

/// Pipeline configuration, loaded from the environment or built in code
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum price a single component may be allocated
    pub price_ceiling: Decimal,

    /// Pause between sequential component create calls
    pub create_delay: Duration,

    /// Comparison price markup applied to the bundle price, in percent
    pub markup_percent: u32,

    /// Catalog API base URL (REST client only)
    pub catalog_endpoint: Option<String>,

    /// Catalog API access token (REST client only)
    pub catalog_token: Option<String>,

    /// Upstream request timeout
    pub request_timeout: Duration,

    /// When set, decisions are computed and reported but nothing is mutated
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            price_ceiling: Decimal::from_str(DEFAULT_PRICE_CEILING).unwrap_or(Decimal::ZERO),
            create_delay: Duration::from_millis(DEFAULT_CREATE_DELAY_MS),
            markup_percent: DEFAULT_MARKUP_PERCENT,
            catalog_endpoint: None,
            catalog_token: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            dry_run: false,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from `SETFORGE_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("SETFORGE_PRICE_CEILING") {
            config.price_ceiling =
                Decimal::from_str(&value).map_err(|_| ConfigError::ParseFailed {
                    key: "SETFORGE_PRICE_CEILING".to_string(),
                    value,
                })?;
        }

        if let Ok(value) = env::var("SETFORGE_CREATE_DELAY_MS") {
            let millis: u64 = value.parse().map_err(|_| ConfigError::ParseFailed {
                key: "SETFORGE_CREATE_DELAY_MS".to_string(),
                value,
            })?;
            config.create_delay = Duration::from_millis(millis);
        }

        if let Ok(value) = env::var("SETFORGE_MARKUP_PERCENT") {
            config.markup_percent = value.parse().map_err(|_| ConfigError::ParseFailed {
                key: "SETFORGE_MARKUP_PERCENT".to_string(),
                value,
            })?;
        }

        if let Ok(value) = env::var("SETFORGE_REQUEST_TIMEOUT") {
            let secs: u64 = value.parse().map_err(|_| ConfigError::ParseFailed {
                key: "SETFORGE_REQUEST_TIMEOUT".to_string(),
                value,
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.catalog_endpoint = env::var("SETFORGE_CATALOG_ENDPOINT").ok();
        config.catalog_token = env::var("SETFORGE_CATALOG_TOKEN").ok();

        config.validate()?;
        Ok(config)
    }

    pub fn with_price_ceiling(mut self, ceiling: Decimal) -> Self {
        self.price_ceiling = ceiling;
        self
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = delay;
        self
    }

    pub fn with_markup_percent(mut self, percent: u32) -> Self {
        self.markup_percent = percent;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validates value ranges. Credentials are checked separately because
    /// mock-backed runs do not need them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.price_ceiling <= Decimal::ZERO {
            return Err(ConfigError::ValidationFailed(
                "price ceiling must be positive".to_string(),
            ));
        }
        if self.markup_percent > 500 {
            return Err(ConfigError::ValidationFailed(format!(
                "markup percent {} is out of range (0..=500)",
                self.markup_percent
            )));
        }
        Ok(())
    }

    /// Returns endpoint and token, or an error if either is missing.
    pub fn catalog_credentials(&self) -> Result<(&str, &str), ConfigError> {
        match (&self.catalog_endpoint, &self.catalog_token) {
            (Some(endpoint), Some(token)) => Ok((endpoint, token)),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}
