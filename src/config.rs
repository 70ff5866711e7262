use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_UNIT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_AGGREGATE_MODEL: &str = "gpt-4";
const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Process-wide settings, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub unit_model: String,
    pub aggregate_model: String,
    pub concurrency: usize,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            unit_model: DEFAULT_UNIT_MODEL.to_string(),
            aggregate_model: DEFAULT_AGGREGATE_MODEL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let concurrency = match read("PRDIGEST_CONCURRENCY") {
            Some(raw) => parse_positive("PRDIGEST_CONCURRENCY", &raw)?,
            None => defaults.concurrency,
        };
        let http_timeout = match read("PRDIGEST_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_positive("PRDIGEST_HTTP_TIMEOUT_SECS", &raw)?),
            None => defaults.http_timeout,
        };

        Ok(Self {
            github_token: read("GITHUB_TOKEN"),
            github_api_url: read("PRDIGEST_GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            openai_api_key: read("OPENAI_API_KEY"),
            openai_base_url: read("PRDIGEST_OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            unit_model: read("PRDIGEST_UNIT_MODEL").unwrap_or(defaults.unit_model),
            aggregate_model: read("PRDIGEST_AGGREGATE_MODEL").unwrap_or(defaults.aggregate_model),
            concurrency,
            http_timeout,
        })
    }
}

fn parse_positive<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(AppError::Configuration(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}
