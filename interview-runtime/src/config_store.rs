use anyhow::Context;
use interview_core::config::AppConfig;
use std::path::{Path, PathBuf};

use crate::files::write_json_atomic;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<AppConfig> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read config: {}", self.path.display()))?;
        let cfg: AppConfig = serde_json::from_slice(&bytes).context("decode config JSON")?;
        Ok(cfg)
    }

    /// Loads the file, or returns built-in defaults when it does not exist yet.
    ///
    /// A file that exists but does not decode is still an error.
    pub fn load_or_default(&self) -> anyhow::Result<AppConfig> {
        if !self.path.exists() {
            log::info!(
                "no config at {}; using defaults",
                self.path.display()
            );
            return Ok(crate::defaults::default_app_config());
        }
        self.load()
    }

    pub fn save(&self, cfg: &AppConfig) -> anyhow::Result<()> {
        write_json_atomic(&self.path, cfg)
            .with_context(|| format!("save config: {}", self.path.display()))
    }
}
