use crate::utils::error::{RelayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> RelayError {
    RelayError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// An absolute http(s) URL with a host.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field_name, url_str, "URL has no host"));
    }
    Ok(url)
}

/// A URL that request paths get appended to, so it may not carry a query
/// string or fragment.
pub fn validate_base_url(field_name: &str, url_str: &str) -> Result<()> {
    let url = validate_url(field_name, url_str)?;
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field_name,
            url_str,
            "Base URL cannot carry a query string or fragment",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // Written as a negated containment so NaN is rejected too.
    if !(value >= min && value <= max) {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api_base", "https://example.com").is_ok());
        assert!(validate_url("api_base", "http://127.0.0.1:8080/v1beta").is_ok());
        assert!(validate_url("api_base", "").is_err());
        assert!(validate_url("api_base", "invalid-url").is_err());
        assert!(validate_url("api_base", "ftp://example.com").is_err());
        assert!(validate_url("api_base", "http://").is_err());
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("api_base", "https://generativelanguage.googleapis.com/v1beta").is_ok());
        assert!(validate_base_url("api_base", "https://proxy.example/v1beta?key=abc").is_err());
        assert!(validate_base_url("api_base", "https://proxy.example/v1beta#frag").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("model", "gemini-2.5-flash").is_ok());
        assert!(validate_non_empty_string("model", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("temperature", 0.2_f32, 0.0, 2.0).is_ok());
        assert!(validate_range("temperature", 2.5_f32, 0.0, 2.0).is_err());
        assert!(validate_range("temperature", f32::NAN, 0.0, 2.0).is_err());
    }
}
