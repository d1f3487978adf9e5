use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interview_{}", self.0.simple())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    Interviewer,
    Candidate,
}

impl Speaker {
    /// Label used when rendering a transcript for a prompt or for display.
    pub fn label(self) -> &'static str {
        match self {
            Speaker::Interviewer => "Interviewer",
            Speaker::Candidate => "Candidate",
        }
    }

    /// Chat-style role name used in persisted transcripts.
    pub fn wire_role(self) -> &'static str {
        match self {
            Speaker::Interviewer => "assistant",
            Speaker::Candidate => "user",
        }
    }

    pub fn from_wire_role(role: &str) -> Option<Self> {
        match role {
            "assistant" => Some(Speaker::Interviewer),
            "user" => Some(Speaker::Candidate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub ts_unix_ms: i64,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            ts_unix_ms: now_unix_ms(),
        }
    }

    pub fn interviewer(text: impl Into<String>) -> Self {
        Self::new(Speaker::Interviewer, text)
    }

    pub fn candidate(text: impl Into<String>) -> Self {
        Self::new(Speaker::Candidate, text)
    }

    pub fn is_candidate(&self) -> bool {
        self.speaker == Speaker::Candidate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown experience level: {0} (expected Entry, Mid or Senior)")]
pub struct UnknownExperienceLevel(pub String);

impl FromStr for ExperienceLevel {
    type Err = UnknownExperienceLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" | "junior" => Ok(ExperienceLevel::Entry),
            "mid" | "intermediate" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            _ => Err(UnknownExperienceLevel(s.to_string())),
        }
    }
}

pub fn now_unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().try_into().unwrap_or(i64::MAX))
        .unwrap_or(0)
}
