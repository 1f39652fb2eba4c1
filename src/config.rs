//! Runtime settings, read from the environment and an optional `.env` file.

use std::env;

use crate::error::Error;
use crate::llms::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::Result;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const TEMPERATURE_VAR: &str = "GEMINI_TEMPERATURE";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const TIMEOUT_VAR: &str = "GEMINI_TIMEOUT_SECS";
pub const LOG_VAR: &str = "MARQUEE_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Key for the hosted model API; only needed for online use
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Settings {
    /// Load `.env` if present, then read settings from the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through a lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let temperature = match get(TEMPERATURE_VAR) {
            Some(raw) => raw.trim().parse::<f32>().map_err(|_| {
                Error::Config(format!("{} must be a number, got {:?}", TEMPERATURE_VAR, raw))
            })?,
            None => 0.2,
        };
        if !(0.0..=2.0).contains(&temperature) {
            return Err(Error::Config(format!(
                "{} must be between 0 and 2, got {}",
                TEMPERATURE_VAR, temperature
            )));
        }

        let timeout_secs = match get(TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    TIMEOUT_VAR, raw
                ))
            })?,
            None => 60,
        };

        Ok(Self {
            api_key: get(API_KEY_VAR),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            base_url: get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs,
            log_level: get(LOG_VAR).unwrap_or_else(|| "info".to_string()),
        })
    }

    /// The API key, or a configuration error telling the user how to set it
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::Config(format!("Please set {} in your .env file", API_KEY_VAR))
        })
    }
}
