use crate::core::extract::JsonObject;
use crate::domain::model::{EvidenceLevel, Verdict};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"(?i)(?:https?://|www\.)\S+").expect("url pattern is valid"))
}

fn horizontal_space_run() -> &'static Regex {
    static SPACES: OnceLock<Regex> = OnceLock::new();
    SPACES.get_or_init(|| Regex::new(r"[ \t]{2,}").expect("space pattern is valid"))
}

fn space_before_punctuation() -> &'static Regex {
    static PUNCT: OnceLock<Regex> = OnceLock::new();
    PUNCT.get_or_init(|| Regex::new(r"[ \t]+([,.;:])").expect("punctuation pattern is valid"))
}

pub fn contains_url(text: &str) -> bool {
    url_pattern().is_match(text)
}

/// Removes URL-like substrings and tidies the whitespace they leave behind.
/// Line breaks are kept.
///
/// Tidying can glue leftovers back into a URL (`www .evil.com`), so passes
/// repeat until none is left. Every pass removes at least one match and the
/// tidy steps never add characters, so this terminates.
pub fn strip_urls(text: &str) -> String {
    let mut current = text.trim().to_string();
    while contains_url(&current) {
        let stripped = url_pattern().replace_all(&current, "");
        let collapsed = horizontal_space_run().replace_all(&stripped, " ");
        current = space_before_punctuation()
            .replace_all(&collapsed, "$1")
            .trim()
            .to_string();
    }
    current
}

/// Builds a Verdict out of whatever object the model produced. Missing or
/// mistyped fields take their defaults and every text is URL-stripped.
pub fn normalize(object: &JsonObject, query: &str) -> Verdict {
    let myth = text_field(object, "myth")
        .filter(|myth| !myth.is_empty())
        .unwrap_or_else(|| strip_urls(query));

    // Older response shapes carried a single "explanation".
    let explanation_simple = text_field(object, "explanation_simple")
        .filter(|text| !text.is_empty())
        .or_else(|| text_field(object, "explanation"))
        .unwrap_or_default();

    let evidence_level = object
        .get("evidenceLevel")
        .and_then(Value::as_str)
        .map(EvidenceLevel::from_label)
        .unwrap_or_default();

    Verdict {
        myth,
        is_true: object.get("isTrue").map(coerce_bool).unwrap_or(false),
        explanation_simple,
        explanation_expert: text_field(object, "explanation_expert").unwrap_or_default(),
        evidence_level,
        sources: list_field(object, "sources"),
        category: text_field(object, "category").unwrap_or_default(),
        related_myths: list_field(object, "relatedMyths"),
    }
}

fn text_field(object: &JsonObject, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(strip_urls)
}

fn list_field(object: &JsonObject, key: &str) -> Vec<String> {
    let items: Vec<&str> = match object.get(key) {
        Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(single)) => vec![single.as_str()],
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(strip_urls)
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => matches!(
            text.trim().to_lowercase().as_str(),
            "true" | "verdadero" | "cierto" | "sí" | "si" | "yes"
        ),
        _ => false,
    }
}
