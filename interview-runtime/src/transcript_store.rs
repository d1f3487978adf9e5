use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use interview_core::record::TranscriptRecord;

use crate::files::write_json_atomic;

/// One pretty-printed JSON file per session: `<dir>/<session_id>.json`.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn at_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, session_id: &str) -> anyhow::Result<PathBuf> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(anyhow!("invalid session id: {session_id:?}"));
        }
        Ok(self.dir.join(format!("{session_id}.json")))
    }

    pub fn save(&self, record: &TranscriptRecord) -> anyhow::Result<PathBuf> {
        let path = self.path_for(&record.session_id)?;
        write_json_atomic(&path, record)
            .with_context(|| format!("failed to save transcript: {}", path.display()))?;
        log::info!(
            "saved transcript {} ({} messages)",
            path.display(),
            record.conversation.len()
        );
        Ok(path)
    }

    pub fn load(&self, session_id: &str) -> anyhow::Result<TranscriptRecord> {
        let path = self.path_for(session_id)?;
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read transcript: {}", path.display()))?;
        let record: TranscriptRecord = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse transcript: {}", path.display()))?;
        Ok(record)
    }
}
