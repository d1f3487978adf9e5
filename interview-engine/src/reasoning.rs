//! Model-side judgment of the latest answer (the LLM-assisted persona track).

use crate::error::InterviewError;
use interview_core::persona::AssessedPersona;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    DrillDown,
    Clarify,
    FollowUp,
    MoveOn,
    Guide,
}

impl FromStr for Strategy {
    type Err = InterviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "drilldown" => Ok(Strategy::DrillDown),
            "clarify" => Ok(Strategy::Clarify),
            "followup" => Ok(Strategy::FollowUp),
            "moveon" => Ok(Strategy::MoveOn),
            "guide" => Ok(Strategy::Guide),
            _ => Err(InterviewError::Decode(format!("unknown strategy: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyDecision {
    pub strategy: Strategy,
    pub next_focus: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningJudgment {
    pub persona: AssessedPersona,
    pub decision: StrategyDecision,
}

#[derive(Deserialize)]
struct RawJudgment {
    detected_persona: String,
    strategy: String,
    #[serde(default)]
    next_focus: String,
    #[serde(default)]
    reasoning: String,
}

/// Decodes `{detected_persona, strategy, next_focus, reasoning}`.
///
/// Unknown persona or strategy labels are rejected rather than defaulted.
pub fn decode_judgment(value: &serde_json::Value) -> Result<ReasoningJudgment, InterviewError> {
    let raw: RawJudgment = serde_json::from_value(value.clone())
        .map_err(|e| InterviewError::Decode(e.to_string()))?;
    let persona = raw
        .detected_persona
        .parse::<AssessedPersona>()
        .map_err(|e| InterviewError::Decode(e.to_string()))?;
    let strategy = raw.strategy.parse::<Strategy>()?;

    Ok(ReasoningJudgment {
        persona,
        decision: StrategyDecision {
            strategy,
            next_focus: raw.next_focus.trim().to_string(),
            reasoning: raw.reasoning.trim().to_string(),
        },
    })
}
