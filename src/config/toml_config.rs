use crate::config::{RelayConfig, API_KEY_VAR, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::utils::error::{RelayError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub gemini: GeminiSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub temperature: Option<f32>,
}

fn env_placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn into_relay_config(self) -> RelayConfig {
        let GeminiSection {
            api_key,
            model,
            api_base,
            temperature,
        } = self.gemini;

        // A placeholder that survived substitution means the variable is unset.
        let api_key = api_key
            .filter(|key| !key.trim().is_empty() && !env_placeholder().is_match(key))
            .or_else(|| std::env::var(API_KEY_VAR).ok().filter(|key| !key.trim().is_empty()));

        RelayConfig {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            temperature: temperature.unwrap_or(DEFAULT_TEMPERATURE),
        }
    }
}

impl RelayConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a `[gemini]` table. Keys that are absent take the same defaults
    /// as [`RelayConfig::from_env`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(TomlConfig::from_toml_str(content)?.into_relay_config())
    }
}

/// Replaces `${VAR_NAME}` with the environment value, leaving unknown
/// placeholders untouched.
fn substitute_env_vars(content: &str) -> String {
    env_placeholder()
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_gemini_table() {
        let toml_content = r#"
[gemini]
api_key = "from-file"
model = "gemini-2.0-flash"
api_base = "http://localhost:9999/v1beta"
temperature = 0.1
"#;

        let config = RelayConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.api_base, "http://localhost:9999/v1beta");
        assert_eq!(config.temperature, 0.1);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = RelayConfig::from_toml_str("[gemini]\napi_key = \"k\"\n").unwrap();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MYTH_RELAY_TEST_MODEL", "gemini-test-model");

        let toml_content = r#"
[gemini]
api_key = "k"
model = "${MYTH_RELAY_TEST_MODEL}"
"#;

        let config = RelayConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.model, "gemini-test-model");

        std::env::remove_var("MYTH_RELAY_TEST_MODEL");
    }

    #[test]
    fn test_unresolved_placeholder_is_not_a_credential() {
        let toml_content = r#"
[gemini]
api_key = "${MYTH_RELAY_TEST_UNSET_KEY}"
"#;

        let parsed = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            parsed.gemini.api_key.as_deref(),
            Some("${MYTH_RELAY_TEST_UNSET_KEY}")
        );

        let config = parsed.into_relay_config();
        assert_ne!(
            config.api_key.as_deref(),
            Some("${MYTH_RELAY_TEST_UNSET_KEY}")
        );
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = RelayConfig::from_toml_str("[gemini\nmodel = ").unwrap_err();
        assert!(matches!(err, RelayError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[gemini]\napi_key = \"file-key\"\nmodel = \"gemini-file\"\n")
            .unwrap();

        let config = RelayConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.model, "gemini-file");
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }
}
