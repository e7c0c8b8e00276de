#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{validate_base_url, validate_non_empty_string, validate_range, Validate};
use std::env;
use std::fmt;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";
pub const TEMPERATURE_VAR: &str = "GEMINI_TEMPERATURE";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Everything the relay needs to know about the upstream service.
///
/// A missing credential is allowed here; the relay reports it per request as
/// `ConfigurationMissing`.
#[derive(Clone, PartialEq)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
}

impl RelayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let temperature = match read(TEMPERATURE_VAR) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "⚠️ Ignoring unparsable {}={:?}, using {}",
                    TEMPERATURE_VAR,
                    raw,
                    DEFAULT_TEMPERATURE
                );
                DEFAULT_TEMPERATURE
            }),
            None => DEFAULT_TEMPERATURE,
        };

        Self {
            api_key: read(API_KEY_VAR),
            model: read(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: read(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            temperature,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// The configured credential, or `ConfigurationMissing`.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RelayError::ConfigurationMissing {
                field: API_KEY_VAR.to_string(),
            })
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

// The credential never reaches logs.
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validate_base_url("api_base", &self.api_base)?;
        validate_non_empty_string("model", &self.model)?;
        validate_range("temperature", self.temperature, 0.0, 2.0)?;

        if self.api_key.is_none() {
            tracing::warn!(
                "⚠️ {} is not set, every request will fail with a configuration error",
                API_KEY_VAR
            );
        }

        tracing::debug!("✅ Relay configuration validation passed");
        Ok(())
    }
}
