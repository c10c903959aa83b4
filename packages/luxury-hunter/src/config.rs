use std::env;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::ConfigError;
use crate::input::parse_numeric_input;
use crate::pricing::{PriceRules, DEFAULT_EXCHANGE_RATE};

/// Model used when `VISION_MODEL` is not set.
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o-mini";

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Required for live analysis only
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub vision_model: String,
    pub exchange_rate: f64,
    pub rules: PriceRules,

    /// Per-image analysis timeout; unbounded when `None`
    pub analysis_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: None,
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            rules: PriceRules::default(),
            analysis_timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = PriceRules::default();

        Ok(Self {
            openai_api_key: var("OPENAI_API_KEY"),
            openai_base_url: var("OPENAI_BASE_URL"),
            vision_model: var("VISION_MODEL").unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            exchange_rate: var("EXCHANGE_RATE")
                .map(|raw| parse_numeric_input(&raw))
                .unwrap_or(DEFAULT_EXCHANGE_RATE),
            rules: PriceRules {
                fee_threshold: parse_var("FEE_THRESHOLD", var("FEE_THRESHOLD"))?
                    .unwrap_or(defaults.fee_threshold),
                handling_fee: parse_var("HANDLING_FEE", var("HANDLING_FEE"))?
                    .unwrap_or(defaults.handling_fee),
            },
            analysis_timeout: parse_var::<u64>("ANALYSIS_TIMEOUT_SECS", var("ANALYSIS_TIMEOUT_SECS"))?
                .map(Duration::from_secs),
        })
    }

    /// The API key, or the error naming the missing variable.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|raw| {
            raw.parse()
                .map_err(|_| ConfigError::Invalid { var: name, value: raw })
        })
        .transpose()
}
