use crate::domain::model::{GenerateRequest, GenerateResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The one outbound capability the relay depends on.
///
/// Implementations must return `RelayError::UpstreamError` for non-success
/// upstream statuses and must not retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;
}
