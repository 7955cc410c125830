use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub api_url: String,
    pub adherence_threshold: f64,
    pub api_timeout: Duration,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Config {
    pub const DEFAULT_API_URL: &'static str = "http://localhost:8000";
    pub const DEFAULT_ADHERENCE_THRESHOLD: f64 = 70.0;
    const DEFAULT_TIMEOUT_SECS: u64 = 15;
    const DEFAULT_CHART_WIDTH: u32 = 1024;
    const DEFAULT_CHART_HEIGHT: u32 = 480;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let api_url = lookup("DASHBOARD_API_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_API_URL.to_string());

        let adherence_threshold = parse_or(
            &lookup,
            "ADHERENCE_THRESHOLD",
            Self::DEFAULT_ADHERENCE_THRESHOLD,
        )?;
        if !(0.0..=100.0).contains(&adherence_threshold) {
            return Err(ConfigError::Invalid {
                key: "ADHERENCE_THRESHOLD",
                value: adherence_threshold.to_string(),
            });
        }

        let timeout_secs: u64 = parse_or(&lookup, "API_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;
        let chart_width = parse_or(&lookup, "CHART_WIDTH", Self::DEFAULT_CHART_WIDTH)?;
        let chart_height = parse_or(&lookup, "CHART_HEIGHT", Self::DEFAULT_CHART_HEIGHT)?;
        for (key, value) in [("CHART_WIDTH", chart_width), ("CHART_HEIGHT", chart_height)] {
            if value == 0 {
                return Err(ConfigError::Invalid { key, value: value.to_string() });
            }
        }

        Ok(Config {
            discord_token,
            api_url,
            adherence_threshold,
            api_timeout: Duration::from_secs(timeout_secs),
            chart_width,
            chart_height,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
