use std::net::SocketAddr;
use std::time::Duration;

use sarmobi_guide_lib::identify::SimulationTimings;
use shared::Language;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be a non-negative integer")]
    ParseInt(String),
    #[error("{key} is invalid: {message}")]
    InvalidValue { key: String, message: String },
}

/// Runtime settings of the HTTP service, read from `SARMOBI_*` variables
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Typing delay before a chat reply is posted
    pub chat_delay: Duration,
    /// Multiplier for the simulated recognition delays; 0 makes them instant
    pub simulation_scale: f64,
    /// Seed for fallback chat replies; `None` cycles through them in order
    pub chat_seed: Option<u64>,
    /// Seed for simulated photo analysis; `None` seeds from entropy
    pub photo_seed: Option<u64>,
    pub default_language: Language,
    /// Sessions untouched for longer than this are dropped
    pub session_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            chat_delay: Duration::from_millis(1000),
            simulation_scale: 1.0,
            chat_seed: None,
            photo_seed: None,
            default_language: Language::En,
            session_ttl: Duration::from_secs(3600),
        }
    }
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn optional_trimmed(lookup: Lookup, key: &str) -> Option<String> {
    lookup(key)
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_u64(lookup: Lookup, key: &str, default: u64) -> Result<u64, ConfigError> {
    match optional_trimmed(lookup, key) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::ParseInt(key.to_string())),
        None => Ok(default),
    }
}

fn parse_optional_u64(lookup: Lookup, key: &str) -> Result<Option<u64>, ConfigError> {
    optional_trimmed(lookup, key)
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|_| ConfigError::ParseInt(key.to_string()))
        })
        .transpose()
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source.
    pub fn from_lookup(lookup: Lookup) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = match optional_trimmed(lookup, "SARMOBI_BIND_ADDR") {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|e| invalid("SARMOBI_BIND_ADDR", e.to_string()))?,
            None => defaults.bind_addr,
        };

        let chat_delay = Duration::from_millis(parse_u64(
            lookup,
            "SARMOBI_CHAT_DELAY_MS",
            defaults.chat_delay.as_millis() as u64,
        )?);

        let simulation_scale = match optional_trimmed(lookup, "SARMOBI_SIMULATION_SCALE") {
            Some(raw) => {
                let scale = raw
                    .parse::<f64>()
                    .map_err(|e| invalid("SARMOBI_SIMULATION_SCALE", e.to_string()))?;
                if !scale.is_finite() || scale < 0.0 {
                    return Err(invalid(
                        "SARMOBI_SIMULATION_SCALE",
                        "must be a non-negative number",
                    ));
                }
                if SimulationTimings::scaled(scale).is_none() {
                    return Err(invalid(
                        "SARMOBI_SIMULATION_SCALE",
                        "scaled recognition delays are out of range",
                    ));
                }
                scale
            }
            None => defaults.simulation_scale,
        };

        let session_ttl = Duration::from_secs(parse_u64(
            lookup,
            "SARMOBI_SESSION_TTL_SECS",
            defaults.session_ttl.as_secs(),
        )?);

        let default_language = match optional_trimmed(lookup, "SARMOBI_DEFAULT_LANGUAGE") {
            Some(raw) => raw
                .parse::<Language>()
                .map_err(|e| invalid("SARMOBI_DEFAULT_LANGUAGE", e))?,
            None => defaults.default_language,
        };

        Ok(Self {
            bind_addr,
            chat_delay,
            simulation_scale,
            chat_seed: parse_optional_u64(lookup, "SARMOBI_CHAT_SEED")?,
            photo_seed: parse_optional_u64(lookup, "SARMOBI_PHOTO_SEED")?,
            default_language,
            session_ttl,
        })
    }
}
