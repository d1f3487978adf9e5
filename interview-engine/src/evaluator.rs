//! Post-interview evaluation with three-tier degradation:
//! structured report, then scores scraped from free text, then a static default.

use crate::client::GenerationClient;
use crate::error::InterviewError;
use crate::session::Session;
use crate::traits::OutputMode;
use interview_core::plan::ResumePlan;
use interview_core::prompts::{build_evaluation_prompt, build_evaluation_text_prompt};
use interview_core::report::EvaluationReport;
use interview_core::roles::RoleProfile;
use interview_core::types::{ExperienceLevel, Turn};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportTier {
    Structured,
    ScrapedText,
}

const TIERS: [ReportTier; 2] = [ReportTier::Structured, ReportTier::ScrapedText];

struct EvaluationInput<'a> {
    transcript: &'a [Turn],
    role: &'a RoleProfile,
    level: ExperienceLevel,
    plan: Option<&'a ResumePlan>,
}

pub struct Evaluator {
    client: Arc<GenerationClient>,
}

impl Evaluator {
    pub fn new(client: Arc<GenerationClient>) -> Self {
        Self { client }
    }

    /// Always returns a report; lower tiers are tried in order as earlier ones fail.
    pub async fn generate_report(
        &self,
        transcript: &[Turn],
        role: &RoleProfile,
        level: ExperienceLevel,
        plan: Option<&ResumePlan>,
    ) -> EvaluationReport {
        let input = EvaluationInput {
            transcript,
            role,
            level,
            plan,
        };

        for tier in TIERS {
            match self.try_tier(tier, &input).await {
                Ok(report) => {
                    log::info!("evaluation produced by {tier:?} tier");
                    return report;
                }
                Err(e) => log::warn!("evaluation tier {tier:?} failed: {e}"),
            }
        }

        log::warn!("evaluation degraded to static default report");
        EvaluationReport::static_default()
    }

    pub async fn evaluate_session(&self, session: &Session) -> EvaluationReport {
        self.generate_report(
            session.transcript(),
            session.role(),
            session.level(),
            session.plan(),
        )
        .await
    }

    async fn try_tier(
        &self,
        tier: ReportTier,
        input: &EvaluationInput<'_>,
    ) -> Result<EvaluationReport, InterviewError> {
        match tier {
            ReportTier::Structured => {
                let prompt =
                    build_evaluation_prompt(input.role, input.level, input.transcript, input.plan);
                let value = self.client.generate_json(&prompt).await?;
                EvaluationReport::from_structured(&value)
                    .map_err(|e| InterviewError::Decode(e.to_string()))
            }
            ReportTier::ScrapedText => {
                let prompt = build_evaluation_text_prompt(
                    input.role,
                    input.level,
                    input.transcript,
                    input.plan,
                );
                let text = self.client.generate(&prompt, OutputMode::Text).await?;
                EvaluationReport::scrape_from_text(&text).ok_or_else(|| {
                    InterviewError::Decode("no scores found in evaluation text".into())
                })
            }
        }
    }
}
