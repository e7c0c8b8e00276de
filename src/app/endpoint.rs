use crate::core::relay::QueryRelay;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{ErrorCategory, RelayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const USER_QUERY_REQUIRED: &str = "userQuery is required and must be a non-empty string";

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
];

/// Proxy-integration request as delivered by API Gateway (REST or HTTP API)
/// and Lambda function URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub http: Option<RequestHttp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestHttp {
    #[serde(default)]
    pub method: Option<String>,
}

impl HttpEvent {
    pub fn new(method: &str, body: Option<&str>) -> Self {
        Self {
            http_method: Some(method.to_string()),
            headers: None,
            body: body.map(str::to_string),
            request_context: None,
        }
    }

    pub fn post_json(body: &Value) -> Self {
        Self::new("POST", Some(&body.to_string()))
    }

    /// Upper-cased method, looking at the v1 field first and the v2
    /// `requestContext.http.method` second.
    /// Request header lookup, ignoring case as HTTP does.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn method(&self) -> String {
        self.http_method
            .as_deref()
            .or_else(|| {
                self.request_context
                    .as_ref()
                    .and_then(|ctx| ctx.http.as_ref())
                    .and_then(|http| http.method.as_deref())
            })
            .unwrap_or_default()
            .to_ascii_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    fn with_cors(status_code: u16, body: String) -> Self {
        let headers = CORS_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn preflight() -> Self {
        Self::with_cors(204, String::new())
    }

    pub fn text(status_code: u16, body: &str) -> Self {
        Self::with_cors(status_code, body.to_string())
    }

    pub fn json<T: Serialize>(status_code: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => {
                let mut response = Self::with_cors(status_code, body);
                response
                    .headers
                    .insert("Content-Type".to_string(), "application/json".to_string());
                response
            }
            Err(e) => Self::error(&RelayError::from(e)),
        }
    }

    pub fn error(err: &RelayError) -> Self {
        Self::json(err.status_code(), &json!({ "error": err.user_friendly_message() }))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Pulls a non-empty string `userQuery` out of a JSON request body.
pub fn parse_user_query(body: Option<&str>) -> Result<String> {
    let body = body
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .ok_or_else(|| RelayError::invalid_input(USER_QUERY_REQUIRED))?;

    let value: Value = serde_json::from_str(body)
        .map_err(|e| RelayError::invalid_input(format!("Request body must be valid JSON: {}", e)))?;

    value
        .get("userQuery")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|query| !query.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RelayError::invalid_input(USER_QUERY_REQUIRED))
}

pub async fn route<G: TextGenerator>(relay: &QueryRelay<G>, event: &HttpEvent) -> HttpResponse {
    let method = event.method();
    match method.as_str() {
        "OPTIONS" => return HttpResponse::preflight(),
        "POST" => {}
        _ => {
            tracing::warn!("⚠️ Received non-POST request: {:?}", method);
            return HttpResponse::text(405, "Method Not Allowed");
        }
    }

    let result = match parse_user_query(event.body.as_deref()) {
        Ok(query) => relay.handle(&query).await.map_err(RelayError::into_internal),
        Err(e) => Err(e),
    };

    match result {
        Ok(verdict) => HttpResponse::json(200, &verdict),
        Err(e) => {
            if e.category() == ErrorCategory::Caller {
                tracing::warn!("⚠️ Bad request: {}", e);
            } else {
                tracing::error!("❌ Request failed: {}", e);
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            }
            HttpResponse::error(&e)
        }
    }
}
