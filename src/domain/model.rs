use serde::{Deserialize, Serialize};

/// Coarse confidence label attached to a [`Verdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvidenceLevel {
    Alta,
    Moderada,
    #[default]
    Baja,
}

impl EvidenceLevel {
    pub const ALL: [EvidenceLevel; 3] = [Self::Alta, Self::Moderada, Self::Baja];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alta => "Alta",
            Self::Moderada => "Moderada",
            Self::Baja => "Baja",
        }
    }

    /// Lenient parse of whatever label the model produced. Unknown labels
    /// land on the lowest tier.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "alta" | "high" => Self::Alta,
            "moderada" | "media" | "moderate" | "medium" => Self::Moderada,
            _ => Self::Baja,
        }
    }
}

/// Why a placeholder Verdict was produced instead of a parsed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The upstream returned no candidates, usually because of content filtering.
    Blocked,
    /// The generated text held no JSON object any strategy could extract.
    Unparseable,
}

impl FallbackReason {
    pub fn category(&self) -> &'static str {
        match self {
            Self::Blocked => "Bloqueado",
            Self::Unparseable => "No procesable",
        }
    }
}

/// The normalized answer handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub myth: String,
    #[serde(rename = "isTrue")]
    pub is_true: bool,
    pub explanation_simple: String,
    pub explanation_expert: String,
    #[serde(rename = "evidenceLevel")]
    pub evidence_level: EvidenceLevel,
    pub sources: Vec<String>,
    pub category: String,
    #[serde(rename = "relatedMyths")]
    pub related_myths: Vec<String>,
}

impl Verdict {
    /// Clearly labelled placeholder used when no answer could be obtained.
    /// `myth` must already be URL-free.
    pub fn fallback(myth: impl Into<String>, reason: FallbackReason) -> Self {
        let explanation_simple = match reason {
            FallbackReason::Blocked => {
                "No se pudo generar una respuesta para esta consulta: el servicio la bloqueó."
            }
            FallbackReason::Unparseable => {
                "No se pudo generar una respuesta para esta consulta: la respuesta recibida no tenía un formato válido."
            }
        };

        Self {
            myth: myth.into(),
            is_true: false,
            explanation_simple: explanation_simple.to_string(),
            explanation_expert: "Sin análisis disponible. Intenta reformular la afirmación."
                .to_string(),
            evidence_level: EvidenceLevel::Baja,
            sources: Vec::new(),
            category: reason.category().to_string(),
            related_myths: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.category == FallbackReason::Blocked.category()
            || self.category == FallbackReason::Unparseable.category()
    }
}

/// Provider-neutral description of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub system_instruction: String,
    pub user_text: String,
    pub response_schema: serde_json::Value,
    pub response_mime_type: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    /// Generated text per candidate, in upstream order. Empty candidates are
    /// already filtered out.
    pub candidates: Vec<String>,
    pub block_reason: Option<String>,
}

impl GenerateResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![text.into()],
            block_reason: None,
        }
    }

    pub fn first_candidate(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }
}
