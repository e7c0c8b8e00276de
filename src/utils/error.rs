use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration missing: {field} is not set")]
    ConfigurationMissing { field: String },

    #[error("Upstream API error ({status}): {message}")]
    UpstreamError { status: u16, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type Result<T> = std::result::Result<T, RelayError>;

/// Who is responsible for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Caller,
    Service,
    Upstream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

const GENERIC_INTERNAL_MESSAGE: &str = "Internal Server Error";

impl RelayError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Folds faults the caller cannot act on (transport, decoding, IO) into
    /// `InternalError`, keeping their text for the logs only.
    pub fn into_internal(self) -> Self {
        match self {
            Self::ApiError(_) | Self::SerializationError(_) | Self::IoError(_) => {
                Self::InternalError {
                    message: self.to_string(),
                }
            }
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::Caller,
            Self::UpstreamError { .. } => ErrorCategory::Upstream,
            _ => ErrorCategory::Service,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidInput { .. } => ErrorSeverity::Low,
            Self::UpstreamError { status, .. } if *status < 500 => ErrorSeverity::Medium,
            Self::UpstreamError { .. } | Self::ApiError(_) => ErrorSeverity::High,
            _ => ErrorSeverity::Critical,
        }
    }

    /// HTTP status the endpoint answers with. Upstream statuses pass through.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::UpstreamError { status, .. } => *status,
            _ => 500,
        }
    }

    /// Message safe to hand back to a caller. Service faults other than a
    /// missing credential collapse to a generic text.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => message.clone(),
            Self::ConfigurationMissing { .. } => {
                "The verification service is not configured on the server".to_string()
            }
            Self::UpstreamError { message, .. } => format!("Upstream API error: {}", message),
            _ => GENERIC_INTERNAL_MESSAGE.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "Send a JSON body with a non-empty string field 'userQuery'",
            Self::ConfigurationMissing { .. } => {
                "Set the GEMINI_API_KEY environment variable for the deployment"
            }
            Self::UpstreamError { status, .. } if *status == 429 => {
                "The upstream quota is exhausted, try again later"
            }
            Self::UpstreamError { .. } => "Check the upstream API status and the configured model",
            Self::ApiError(_) => "Check network connectivity to the upstream API",
            Self::InvalidConfigValueError { .. } | Self::ConfigError { .. } => {
                "Fix the configuration value and restart"
            }
            _ => "Inspect the service logs for details",
        }
    }
}
