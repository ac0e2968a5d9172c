use crate::models::common::Credentials;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const BASE_URL_VAR: &str = "BASE_URL";
pub const API_KEY_VAR: &str = "API_KEY";
pub const API_SECRET_VAR: &str = "API_SECRET";
pub const PASSPHRASE_VAR: &str = "PASSPHRASE";
pub const RESPONSE_MODE_VAR: &str = "FORMIDIUM_RESPONSE_MODE";
pub const TIME_ZONE_VAR: &str = "FORMIDIUM_TIME_ZONE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration value: {0}")]
    MissingVar(&'static str),

    #[error("Invalid response mode `{0}`, expected `strict` or `raw`")]
    InvalidResponseMode(String),

    #[error("Failed to read env file: {0}")]
    EnvFileError(#[from] dotenvy::Error),
}

/// How `Client::call` treats the service's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Parse the envelope; `Error` titles and non-JSON bodies become errors.
    #[default]
    Strict,
    /// Hand back status and body without looking at the envelope.
    Raw,
}

impl FromStr for ResponseMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ResponseMode::Strict),
            "raw" => Ok(ResponseMode::Raw),
            _ => Err(ConfigError::InvalidResponseMode(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub response_mode: ResponseMode,
    /// IANA zone sent in the `timeZone` header. Detected from the host when unset.
    pub time_zone: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            credentials,
            response_mode: ResponseMode::default(),
            time_zone: None,
        }
    }

    pub fn with_response_mode(mut self, response_mode: ResponseMode) -> Self {
        self.response_mode = response_mode;
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads a dotenv file without touching the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let vars = dotenvy::from_path_iter(path.as_ref())?
            .collect::<Result<HashMap<String, String>, _>>()?;
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let credentials = Credentials::new(
            required(API_KEY_VAR)?,
            required(API_SECRET_VAR)?,
            required(PASSPHRASE_VAR)?,
        );
        let mut config = ClientConfig::new(required(BASE_URL_VAR)?, credentials);

        if let Some(mode) = lookup(RESPONSE_MODE_VAR) {
            config.response_mode = mode.parse()?;
        }
        config.time_zone = lookup(TIME_ZONE_VAR).filter(|tz| !tz.trim().is_empty());

        Ok(config)
    }
}
