//! Transport-neutral JSON POST description; [`crate::runtime::execute`] sends it.

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON payload.
    pub json: String,
}

impl HttpRequest {
    pub fn post_json(url: impl Into<String>, payload: &serde_json::Value) -> Self {
        Self {
            url: url.into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            json: payload.to_string(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> &str {
        &self.json
    }
}

fn shown_value<'a>(name: &str, value: &'a str) -> &'a str {
    let lower = name.to_ascii_lowercase();
    if lower == "authorization" || lower.contains("api-key") {
        "[REDACTED]"
    } else {
        value
    }
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| (k.as_str(), shown_value(k, v)))
            .collect();

        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("headers", &headers)
            .field("json_len", &self.json.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_json_sets_content_type_and_payload() {
        let req = HttpRequest::post_json("https://example.com/v1", &serde_json::json!({"a": 1}))
            .with_bearer("sk-test-123");

        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("AUTHORIZATION"), Some("Bearer sk-test-123"));
        assert_eq!(req.json_body(), r#"{"a":1}"#);
    }

    #[test]
    fn debug_never_prints_credentials() {
        let req = HttpRequest::post_json("https://example.com", &serde_json::json!({"q": "hi"}))
            .with_bearer("sk-test-123")
            .with_header("X-Api-Key", "x-789");

        let s = format!("{req:?}");
        assert!(!s.contains("sk-test-123"));
        assert!(!s.contains("x-789"));
        assert!(s.contains("[REDACTED]"));
        assert!(s.contains("json_len: 10"));
    }
}
