use anyhow::{Context, Result};
use party_core::MatchConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://sketch_party.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub database_url: String,
    pub match_config: MatchConfig,
    pub prompt_api_url: Option<String>,
    pub prompt_api_timeout: Duration,
    pub tick_interval: Duration,
}

impl HostConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = MatchConfig::default();
        let match_config = MatchConfig {
            max_rounds: parse_or(&lookup, "MAX_ROUNDS", defaults.max_rounds)?,
            turn_seconds: parse_or(&lookup, "TURN_SECONDS", defaults.turn_seconds)?,
            speed_bonus_seconds: parse_or(
                &lookup,
                "SPEED_BONUS_SECONDS",
                defaults.speed_bonus_seconds,
            )?,
            ..defaults
        };
        match_config
            .validate()
            .context("Invalid match configuration")?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            match_config,
            prompt_api_url: lookup("PROMPT_API_URL").filter(|url| !url.trim().is_empty()),
            prompt_api_timeout: Duration::from_secs(parse_or(
                &lookup,
                "PROMPT_API_TIMEOUT_SECONDS",
                10,
            )?),
            tick_interval: Duration::from_secs(1),
        })
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            match_config: MatchConfig::default(),
            prompt_api_url: None,
            prompt_api_timeout: Duration::from_secs(10),
            tick_interval: Duration::from_secs(1),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", key, raw)),
        None => Ok(default),
    }
}
