use crate::reasoning::StrategyDecision;
use interview_core::assessment::ResponseAssessment;
use interview_core::persona::{HeuristicPersonaTracker, LlmPersonaTracker};
use interview_core::plan::ResumePlan;
use interview_core::record::{RecordMessage, RecordMetadata, TranscriptRecord};
use interview_core::roles::{RoleProfile, question_signature};
use interview_core::types::{ExperienceLevel, SessionId, Speaker, Turn, now_unix_ms};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Ended,
}

impl SessionStatus {
    // Stable label for persisted records.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "not_started",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Ended => "completed",
        }
    }
}

/// All mutable state of one interview.
///
/// The transcript is append-only. Counters are only changed by the controller.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    role: RoleProfile,
    level: ExperienceLevel,
    pub(crate) status: SessionStatus,
    transcript: Vec<Turn>,
    pub(crate) question_count: u32,
    pub(crate) topics_covered: BTreeSet<String>,
    pub(crate) focus_areas_covered: BTreeSet<String>,
    asked_questions: HashSet<String>,
    pub(crate) follow_up_count: u32,
    pub(crate) quality_history: Vec<ResponseAssessment>,
    pub(crate) heuristic_persona: HeuristicPersonaTracker,
    pub(crate) llm_persona: LlmPersonaTracker,
    pub(crate) plan: Option<ResumePlan>,
    pub(crate) last_strategy: Option<StrategyDecision>,
    pub(crate) closing_emitted: bool,
    started_at: Option<i64>,
}

impl Session {
    pub fn new(role: RoleProfile, level: ExperienceLevel) -> Self {
        Self {
            id: SessionId::new(),
            role,
            level,
            status: SessionStatus::NotStarted,
            transcript: Vec::new(),
            question_count: 0,
            topics_covered: BTreeSet::new(),
            focus_areas_covered: BTreeSet::new(),
            asked_questions: HashSet::new(),
            follow_up_count: 0,
            quality_history: Vec::new(),
            heuristic_persona: HeuristicPersonaTracker::new(),
            llm_persona: LlmPersonaTracker::new(),
            plan: None,
            last_strategy: None,
            closing_emitted: false,
            started_at: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn role(&self) -> &RoleProfile {
        &self.role
    }

    pub fn level(&self) -> ExperienceLevel {
        self.level
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn follow_up_count(&self) -> u32 {
        self.follow_up_count
    }

    pub fn topics_covered(&self) -> &BTreeSet<String> {
        &self.topics_covered
    }

    pub fn focus_areas_covered(&self) -> &BTreeSet<String> {
        &self.focus_areas_covered
    }

    pub fn quality_history(&self) -> &[ResponseAssessment] {
        &self.quality_history
    }

    pub fn plan(&self) -> Option<&ResumePlan> {
        self.plan.as_ref()
    }

    pub fn last_strategy(&self) -> Option<&StrategyDecision> {
        self.last_strategy.as_ref()
    }

    pub fn closing_emitted(&self) -> bool {
        self.closing_emitted
    }

    pub fn heuristic_persona(&self) -> &HeuristicPersonaTracker {
        &self.heuristic_persona
    }

    pub fn llm_persona(&self) -> &LlmPersonaTracker {
        &self.llm_persona
    }

    /// Engagement from whichever persona track has observed the candidate.
    pub fn engagement_score(&self) -> f64 {
        if self.llm_persona.history().is_empty() {
            self.heuristic_persona.engagement_score()
        } else {
            self.llm_persona.engagement_score()
        }
    }

    /// Mean assessment score over all answered turns.
    pub fn mean_score(&self) -> Option<f64> {
        if self.quality_history.is_empty() {
            return None;
        }
        let sum: u32 = self.quality_history.iter().map(|a| a.score as u32).sum();
        Some(sum as f64 / self.quality_history.len() as f64)
    }

    pub fn all_categories_covered(&self) -> bool {
        self.role
            .categories
            .iter()
            .all(|c| self.topics_covered.contains(c))
    }

    pub fn last_interviewer_utterance(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|t| t.speaker == Speaker::Interviewer)
            .map(|t| t.text.as_str())
    }

    pub fn has_asked(&self, question: &str) -> bool {
        self.asked_questions.contains(&question_signature(question))
    }

    pub(crate) fn record_question(&mut self, question: &str) {
        self.asked_questions.insert(question_signature(question));
    }

    pub(crate) fn push_turn(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }

    pub(crate) fn mark_started(&mut self) {
        self.status = SessionStatus::InProgress;
        self.started_at = Some(now_unix_ms());
    }

    pub fn to_record(&self) -> TranscriptRecord {
        TranscriptRecord {
            session_id: self.id.to_string(),
            metadata: RecordMetadata {
                role: self.role.title.clone(),
                experience_level: self.level.as_str().to_string(),
                start_time: self
                    .started_at
                    .or_else(|| self.transcript.first().map(|t| t.ts_unix_ms))
                    .unwrap_or_else(now_unix_ms),
                status: self.status.as_str().to_string(),
            },
            conversation: self.transcript.iter().map(RecordMessage::from).collect(),
        }
    }
}
