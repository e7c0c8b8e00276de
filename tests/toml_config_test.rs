use anyhow::Result;
use httpmock::prelude::*;
use myth_relay::utils::validation::Validate;
use myth_relay::{EvidenceLevel, GeminiClient, QueryRelay, RelayConfig};
use serde_json::json;
use tempfile::TempDir;

/// A relay built purely from a TOML file talks to the configured base URL
/// and model.
#[tokio::test]
async fn test_relay_from_toml_file() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/custom/models/gemini-2.0-flash:generateContent")
            .header("x-goog-api-key", "file-key")
            .json_body_partial(r#"{"generationConfig": {"temperature": 0.5}}"#);
        then.status(200).json_body(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"myth\": \"m\", \"evidenceLevel\": \"Moderada\"}"}]}
            }]
        }));
    });

    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("relay.toml");
    let config_content = format!(
        r#"
[gemini]
api_key = "file-key"
model = "gemini-2.0-flash"
api_base = "{}"
temperature = 0.5
"#,
        server.url("/custom")
    );
    tokio::fs::write(&config_path, config_content).await?;

    let config = RelayConfig::from_file(&config_path)?;
    config.validate()?;

    let relay = QueryRelay::new(config.clone(), GeminiClient::new(&config));
    let verdict = relay.handle("consulta").await?;

    api_mock.assert();
    assert_eq!(verdict.myth, "m");
    assert_eq!(verdict.evidence_level, EvidenceLevel::Moderada);
    Ok(())
}

#[tokio::test]
async fn test_invalid_api_base_fails_validation() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("bad.toml");
    tokio::fs::write(&config_path, "[gemini]\napi_base = \"ftp://nope\"\n").await?;

    let config = RelayConfig::from_file(&config_path)?;
    assert!(config.validate().is_err());
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let err = RelayConfig::from_file("/definitely/not/here/relay.toml").unwrap_err();
    assert!(matches!(err, myth_relay::RelayError::IoError(_)));
}
