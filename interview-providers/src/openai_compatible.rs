use crate::request::HttpRequest;
use serde_json::json;

#[derive(Clone, PartialEq)]
pub struct OpenAiCompatibleChatConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl std::fmt::Debug for OpenAiCompatibleChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleChatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Builds a `/chat/completions` request.
///
/// With `json_mode` the endpoint is asked for a single JSON object
/// (`response_format: {"type": "json_object"}`).
pub fn build_chat_completions_request(
    cfg: &OpenAiCompatibleChatConfig,
    messages: &[ChatMessage],
    json_mode: bool,
) -> HttpRequest {
    let url = join_url(&cfg.base_url, "/chat/completions");

    let mut payload = json!({
        "model": cfg.model,
        "messages": messages.iter().map(|m| json!({"role": m.role, "content": m.content})).collect::<Vec<_>>(),
        "temperature": cfg.temperature,
    });
    if json_mode {
        payload["response_format"] = json!({"type": "json_object"});
    }

    HttpRequest::post_json(url, &payload).with_bearer(&cfg.api_key)
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
