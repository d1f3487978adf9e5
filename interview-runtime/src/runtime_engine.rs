use std::sync::Arc;

use interview_core::config::AppConfig;
use interview_engine::client::{GenerationClient, RetryPolicy};
use interview_engine::controller::InterviewController;
use interview_engine::error::InterviewError;
use interview_engine::evaluator::Evaluator;
use interview_engine::traits::TextGenerator;

use crate::llm::OpenAiCompatibleGenerator;
use crate::secrets::resolve_api_key;

/// Generation client for `cfg`, talking to the configured OpenAI-compatible endpoint.
pub fn build_client_from_config(cfg: &AppConfig, api_key: &str) -> Arc<GenerationClient> {
    let generator: Arc<dyn TextGenerator> =
        Arc::new(OpenAiCompatibleGenerator::new(&cfg.llm, api_key));
    Arc::new(GenerationClient::new(generator, RetryPolicy::from(&cfg.retry)))
}

/// Build a runnable controller from config.
///
/// A role catalog in the config replaces the builtin one.
pub fn build_controller_from_config(cfg: &AppConfig, api_key: &str) -> InterviewController {
    let controller = InterviewController::new(
        build_client_from_config(cfg, api_key),
        cfg.interview.clone(),
    );
    match &cfg.roles {
        Some(roles) => controller.with_roles(roles.clone()),
        None => controller,
    }
}

pub fn build_evaluator_from_config(cfg: &AppConfig, api_key: &str) -> Evaluator {
    Evaluator::new(build_client_from_config(cfg, api_key))
}

/// Controller and evaluator sharing one client, so spacing and stats span both.
pub struct InterviewRuntime {
    pub controller: InterviewController,
    pub evaluator: Evaluator,
}

impl InterviewRuntime {
    pub fn from_config(cfg: &AppConfig, api_key: &str) -> Self {
        let client = build_client_from_config(cfg, api_key);
        let controller = InterviewController::new(client.clone(), cfg.interview.clone());
        let controller = match &cfg.roles {
            Some(roles) => controller.with_roles(roles.clone()),
            None => controller,
        };
        Self {
            controller,
            evaluator: Evaluator::new(client),
        }
    }

    /// Like [`InterviewRuntime::from_config`], resolving the key from env or keyring.
    pub fn from_config_with_stored_key(cfg: &AppConfig) -> Result<Self, InterviewError> {
        let key = resolve_api_key()?;
        Ok(Self::from_config(cfg, &key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::config::RetrySettings;
    use interview_core::report::ReportSource;
    use interview_core::roles::RoleCatalog;
    use interview_core::types::ExperienceLevel;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.llm.base_url = base_url;
        cfg.retry = RetrySettings {
            max_attempts: 2,
            base_delay_ms: 0,
            rate_limit_penalty_ms: 0,
            max_rate_limit_waits: 1,
            min_spacing_ms: 0,
            max_jitter_ms: 0,
        };
        cfg
    }

    fn completion(content: &str) -> ResponseTemplate {
        let body = serde_json::json!({"choices": [{"message": {"content": content}}]});
        ResponseTemplate::new(200).set_body_json(body)
    }

    #[tokio::test]
    async fn evaluator_reads_structured_report_from_endpoint() {
        let server = MockServer::start().await;
        let report = r#"{"scores":{"communication":90,"technical":70},"hiring_decision":"Hire","executive_summary":"Solid."}"#;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion(report))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = config(server.uri());
        let runtime = InterviewRuntime::from_config(&cfg, "sk-test");
        let session = runtime
            .controller
            .new_session("Software Engineer", ExperienceLevel::Senior);

        let report = runtime.evaluator.evaluate_session(&session).await;
        assert_eq!(report.source, ReportSource::Structured);
        assert_eq!(report.scores["communication"], 90);
        assert_eq!(report.hiring_decision, "Hire");
        assert_eq!(runtime.controller.client().stats().successful_requests, 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_degrades_to_static_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let cfg = config(server.uri());
        let evaluator = build_evaluator_from_config(&cfg, "sk-test");
        let controller = build_controller_from_config(&cfg, "sk-test");
        let session = controller.new_session("Sales Representative", ExperienceLevel::Mid);

        let report = evaluator.evaluate_session(&session).await;
        assert_eq!(report.source, ReportSource::StaticDefault);
    }

    #[test]
    fn configured_roles_replace_builtin_catalog() {
        let mut cfg = config("http://127.0.0.1:9".into());
        let catalog = RoleCatalog::from_json(
            r#"{"roles":[{"title":"Barista","categories":["coffee"],
                "question_bank":{"coffee":["How do you dial in espresso?"]},
                "opening_questions":["Why coffee?"],
                "fallback_questions":["What drink do you make best?"]}]}"#,
        )
        .unwrap();
        cfg.roles = Some(catalog);

        let controller = build_controller_from_config(&cfg, "sk-test");
        let session = controller.new_session("Barista", ExperienceLevel::Entry);
        assert_eq!(session.role().categories, vec!["coffee".to_string()]);
        assert!(controller.roles().get("Software Engineer").is_none());
    }
}
