//! Recovering a JSON object from model output that may be wrapped in a code
//! fence, surrounded by prose, or otherwise not quite JSON.
//!
//! Each strategy is a pure function. [`extract_object`] tries them in order and
//! stops at the first hit.

use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;
pub type Strategy = fn(&str) -> Option<JsonObject>;

pub const STRATEGIES: [(&str, Strategy); 3] = [
    ("strict", parse_strict),
    ("fenced", parse_fenced),
    ("balanced", parse_balanced),
];

const FENCE: &str = "```";

pub fn extract_object(text: &str) -> Option<JsonObject> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(text);
        if found.is_some() {
            tracing::debug!("🧩 Extracted JSON object with the '{}' strategy", name);
        }
        found
    })
}

/// Objects pass through, arrays yield their first object element.
fn object_from(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        Value::Array(items) => items.into_iter().find_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        }),
        _ => None,
    }
}

pub fn parse_strict(text: &str) -> Option<JsonObject> {
    serde_json::from_str::<Value>(text.trim())
        .ok()
        .and_then(object_from)
}

pub fn parse_fenced(text: &str) -> Option<JsonObject> {
    strip_code_fence(text).and_then(parse_strict)
}

/// Returns the contents of the first Markdown code fence, without the
/// language tag. A missing closing fence takes everything to the end.
pub fn strip_code_fence(text: &str) -> Option<&str> {
    let start = text.find(FENCE)?;
    let after_fence = &text[start + FENCE.len()..];

    let tag_len = after_fence
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
        .unwrap_or(after_fence.len());
    let after_tag = &after_fence[tag_len..];

    let body = match after_tag.find('\n') {
        Some(newline) if after_tag[..newline].trim().is_empty() => &after_tag[newline + 1..],
        _ => after_tag,
    };

    let inner = match body.find(FENCE) {
        Some(end) => &body[..end],
        None => body,
    };
    Some(inner.trim())
}

/// Stray braces tolerated before the balanced strategy gives up. Each restart
/// rescans the remainder, so this bounds the work to a multiple of the input.
pub const MAX_UNCLOSED_RESTARTS: usize = 8;

pub fn parse_balanced(text: &str) -> Option<JsonObject> {
    let mut rest = text;
    for _ in 0..=MAX_UNCLOSED_RESTARTS {
        let scan = scan_balanced(rest);
        let parsed = scan.spans.iter().find_map(|span| {
            match serde_json::from_str::<Value>(span) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            }
        });
        if parsed.is_some() {
            return parsed;
        }

        // A stray '{' swallowed the remainder; resume right after it.
        let unclosed = scan.unclosed_start?;
        rest = &rest[unclosed + 1..];
    }

    tracing::debug!(
        "Gave up on balanced scan after {} unclosed braces",
        MAX_UNCLOSED_RESTARTS + 1
    );
    None
}

#[derive(Debug, Default, PartialEq)]
pub struct BalancedScan<'a> {
    /// Top-level `{...}` spans in order of appearance.
    pub spans: Vec<&'a str>,
    /// Byte offset of an opening brace that was never closed.
    pub unclosed_start: Option<usize>,
}

/// Depth-counts braces, ignoring any inside double-quoted strings (with
/// backslash escapes). Quotes outside a span are plain prose.
pub fn scan_balanced(text: &str) -> BalancedScan<'_> {
    let mut scan = BalancedScan::default();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if depth == 0 {
            if ch == '{' {
                start = i;
                depth = 1;
            }
            continue;
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    scan.spans.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        scan.unclosed_start = Some(start);
    }
    scan
}
