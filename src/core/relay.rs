use crate::config::RelayConfig;
use crate::core::{extract, prompt, sanitize};
use crate::domain::model::{FallbackReason, GenerateResponse, Verdict};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{RelayError, Result};

/// Validates a query, asks the generator once and turns whatever comes back
/// into a [`Verdict`].
///
/// Holds no per-request state, so one instance can serve concurrent
/// invocations.
pub struct QueryRelay<G: TextGenerator> {
    config: RelayConfig,
    generator: G,
}

impl<G: TextGenerator> QueryRelay<G> {
    pub fn new(config: RelayConfig, generator: G) -> Self {
        Self { config, generator }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub async fn handle(&self, query: &str) -> Result<Verdict> {
        let query = query.trim();
        if query.is_empty() {
            tracing::warn!("⚠️ Rejected empty query");
            return Err(RelayError::invalid_input(
                "userQuery is required and must be a non-empty string",
            ));
        }

        self.config.require_api_key().map_err(|e| {
            tracing::error!("❌ {} - refusing to call upstream", e);
            e
        })?;

        tracing::debug!("Received query: {:?}", query);
        let request = prompt::build_request(&self.config, query);

        tracing::info!("📡 Calling upstream model {}", request.model);
        let response = self.generator.generate(&request).await.map_err(|e| {
            tracing::error!(
                "❌ Upstream call failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            e
        })?;

        Ok(verdict_from_response(query, &response))
    }
}

/// Extraction and normalization of a successful upstream response. Malformed
/// or missing output becomes a fallback Verdict rather than an error.
pub fn verdict_from_response(query: &str, response: &GenerateResponse) -> Verdict {
    let Some(text) = response.first_candidate() else {
        tracing::warn!(
            "⚠️ Upstream returned no candidates (block reason: {})",
            response.block_reason.as_deref().unwrap_or("none")
        );
        return Verdict::fallback(sanitize::strip_urls(query), FallbackReason::Blocked);
    };

    match extract::extract_object(text) {
        Some(object) => {
            let verdict = sanitize::normalize(&object, query);
            tracing::info!(
                "✅ Verdict ready (isTrue: {}, evidence: {})",
                verdict.is_true,
                verdict.evidence_level.as_str()
            );
            verdict
        }
        None => {
            tracing::warn!(
                "⚠️ Could not extract a JSON object from {} bytes of generated text",
                text.len()
            );
            Verdict::fallback(sanitize::strip_urls(query), FallbackReason::Unparseable)
        }
    }
}
