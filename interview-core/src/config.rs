use crate::roles::RoleCatalog;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSettings {
    #[serde(default = "default_max_follow_ups")]
    pub max_follow_ups: u32,

    // When set, the interview closes after exactly this many questions.
    #[serde(default)]
    pub question_cap: Option<u32>,

    // Ask the model to judge persona/strategy each turn.
    #[serde(default)]
    pub use_reasoning: bool,

    #[serde(default = "default_efficient_word_threshold")]
    pub efficient_word_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_rate_limit_penalty_ms")]
    pub rate_limit_penalty_ms: u64,
    #[serde(default = "default_max_rate_limit_waits")]
    pub max_rate_limit_waits: u32,
    #[serde(default = "default_min_spacing_ms")]
    pub min_spacing_ms: u64,
    /// Upper bound of the random delay added to each backoff.
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub llm: LlmSettings,
    #[serde(default)]
    pub interview: InterviewSettings,
    #[serde(default)]
    pub retry: RetrySettings,

    // Replaces the built-in role catalog when present.
    #[serde(default)]
    pub roles: Option<RoleCatalog>,
}

impl AppConfig {
    pub fn role_catalog(&self) -> &RoleCatalog {
        self.roles.as_ref().unwrap_or_else(|| RoleCatalog::builtin())
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            temperature: default_temperature(),
        }
    }
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            max_follow_ups: default_max_follow_ups(),
            question_cap: None,
            use_reasoning: false,
            efficient_word_threshold: default_efficient_word_threshold(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            rate_limit_penalty_ms: default_rate_limit_penalty_ms(),
            max_rate_limit_waits: default_max_rate_limit_waits(),
            min_spacing_ms: default_min_spacing_ms(),
            max_jitter_ms: default_max_jitter_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            interview: InterviewSettings::default(),
            retry: RetrySettings::default(),
            roles: None,
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_follow_ups() -> u32 {
    1
}

fn default_efficient_word_threshold() -> usize {
    50
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_rate_limit_penalty_ms() -> u64 {
    60_000
}

fn default_max_rate_limit_waits() -> u32 {
    3
}

fn default_min_spacing_ms() -> u64 {
    500
}

fn default_max_jitter_ms() -> u64 {
    250
}
