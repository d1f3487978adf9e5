use interview_core::config::AppConfig;
use std::path::PathBuf;

/// Overrides the directory holding config and transcripts.
pub const HOME_ENV: &str = "INTERVIEW_COACH_HOME";
pub const API_KEY_ENV: &str = "LLM_API_KEY";
pub const BASE_URL_ENV: &str = "LLM_BASE_URL";
pub const MODEL_ENV: &str = "LLM_MODEL";

const APP_DIR: &str = "interview-coach";

/// `INTERVIEW_COACH_HOME` when set, else the platform data directory
/// (e.g. `~/.local/share/interview-coach` on Linux).
pub fn default_home_dir() -> PathBuf {
    resolve_home_dir(non_empty_env(HOME_ENV), dirs::data_dir())
}

fn resolve_home_dir(env_override: Option<String>, data_dir: Option<PathBuf>) -> PathBuf {
    if let Some(home) = env_override {
        return PathBuf::from(home);
    }
    data_dir
        .or_else(dirs::home_dir)
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR}")))
}

pub fn default_config_path() -> PathBuf {
    default_home_dir().join("config.json")
}

pub fn default_transcript_dir() -> PathBuf {
    default_home_dir().join("transcripts")
}

/// Built-in config with `LLM_BASE_URL` / `LLM_MODEL` applied when set.
pub fn default_app_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    apply_env_overrides(&mut cfg);
    cfg
}

pub fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Some(url) = non_empty_env(BASE_URL_ENV) {
        cfg.llm.base_url = url;
    }
    if let Some(model) = non_empty_env(MODEL_ENV) {
        cfg.llm.model = model;
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_over_platform_dir() {
        let home = resolve_home_dir(
            Some("/srv/coach".to_string()),
            Some(PathBuf::from("/home/u/.local/share")),
        );
        assert_eq!(home, PathBuf::from("/srv/coach"));
    }

    #[test]
    fn platform_data_dir_is_used_by_default() {
        let home = resolve_home_dir(None, Some(PathBuf::from("/home/u/.local/share")));
        assert_eq!(home, PathBuf::from("/home/u/.local/share/interview-coach"));
        assert_eq!(
            home.join("transcripts"),
            PathBuf::from("/home/u/.local/share/interview-coach/transcripts")
        );
    }
}
