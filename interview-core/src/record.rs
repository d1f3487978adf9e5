//! Persisted shape of a finished (or in-flight) interview.

use crate::types::{Speaker, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub role: String,
    pub experience_level: String,
    pub start_time: i64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMessage {
    pub role: String,
    pub content: String,
    pub timestamp: i64,
}

impl From<&Turn> for RecordMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.speaker.wire_role().into(),
            content: turn.text.clone(),
            timestamp: turn.ts_unix_ms,
        }
    }
}

impl RecordMessage {
    /// Back to a transcript turn; `None` for roles other than assistant/user.
    pub fn to_turn(&self) -> Option<Turn> {
        Some(Turn {
            speaker: Speaker::from_wire_role(&self.role)?,
            text: self.content.clone(),
            ts_unix_ms: self.timestamp,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub session_id: String,
    pub metadata: RecordMetadata,
    pub conversation: Vec<RecordMessage>,
}

impl TranscriptRecord {
    pub fn turns(&self) -> Vec<Turn> {
        self.conversation
            .iter()
            .filter_map(RecordMessage::to_turn)
            .collect()
    }
}
