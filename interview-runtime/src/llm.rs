use interview_core::config::LlmSettings;
use interview_engine::traits::{OutputMode, TextGenerator};
use interview_providers::openai_compatible::{
    ChatMessage, OpenAiCompatibleChatConfig, build_chat_completions_request,
};

/// [`TextGenerator`] backed by any OpenAI-compatible `/chat/completions` endpoint.
/// `Debug` goes through the config's redacting impl.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleGenerator {
    cfg: OpenAiCompatibleChatConfig,
}

impl OpenAiCompatibleGenerator {
    pub fn new(settings: &LlmSettings, api_key: impl Into<String>) -> Self {
        Self {
            cfg: OpenAiCompatibleChatConfig {
                base_url: settings.base_url.clone(),
                api_key: api_key.into(),
                model: settings.model.clone(),
                temperature: settings.temperature,
            },
        }
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate(&self, prompt: &str, mode: OutputMode) -> anyhow::Result<String> {
        let req = build_chat_completions_request(
            &self.cfg,
            &[ChatMessage::user(prompt)],
            mode == OutputMode::Structured,
        );
        log::debug!("POST {} ({mode:?}, model={})", req.url, self.cfg.model);

        // Non-2xx becomes an HttpStatusError so the client can classify it.
        let resp = interview_providers::runtime::execute(&req)
            .await?
            .error_for_status()?;
        interview_providers::parse::parse_openai_chat_completion(&resp.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_providers::HttpStatusError;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: String) -> LlmSettings {
        LlmSettings {
            base_url,
            model: "gpt-4o-mini".into(),
            temperature: 0.5,
        }
    }

    #[tokio::test]
    async fn structured_mode_requests_json_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "response_format": {"type": "json_object"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"choices":[{"message":{"content":"{\"ok\":true}"}}]}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let generator =
            OpenAiCompatibleGenerator::new(&settings(format!("{}/v1", server.uri())), "sk-test");
        let out = generator
            .generate("judge this", OutputMode::Structured)
            .await
            .unwrap();
        assert_eq!(out, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn non_success_status_is_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limit reached"))
            .mount(&server)
            .await;

        let generator = OpenAiCompatibleGenerator::new(&settings(server.uri()), "sk-test");
        let err = generator.generate("hi", OutputMode::Text).await.unwrap_err();
        let status = err.downcast_ref::<HttpStatusError>().unwrap();
        assert_eq!(status.status, 429);
    }

    #[test]
    fn debug_hides_api_key() {
        let generator = OpenAiCompatibleGenerator::new(&settings("http://x".into()), "sk-secret");
        assert!(!format!("{generator:?}").contains("sk-secret"));
    }
}
