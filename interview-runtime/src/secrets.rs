use anyhow::Context;
use interview_engine::error::InterviewError;

use crate::defaults::API_KEY_ENV;

/// Keyring service name; constant so upgrades don't orphan stored keys.
const SERVICE: &str = "interview-coach";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKey {
    LlmApiKey,
}

impl SecretKey {
    fn user(self) -> &'static str {
        match self {
            SecretKey::LlmApiKey => "llm_api_key",
        }
    }
}

pub fn set_secret(key: SecretKey, value: &str) -> anyhow::Result<()> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;
    entry.set_password(value).context("set secret")
}

pub fn get_secret(key: SecretKey) -> anyhow::Result<Option<String>> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;

    match entry.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(anyhow::Error::new(e)).context("get secret"),
    }
}

pub fn delete_secret(key: SecretKey) -> anyhow::Result<()> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(anyhow::Error::new(e)).context("delete secret"),
    }
}

/// The generation API key: `LLM_API_KEY`, else the OS keyring.
///
/// A missing key is the one fatal startup error.
pub fn resolve_api_key() -> Result<String, InterviewError> {
    resolve_api_key_with(std::env::var(API_KEY_ENV).ok(), || {
        get_secret(SecretKey::LlmApiKey)
    })
}

fn resolve_api_key_with(
    env_value: Option<String>,
    keyring_lookup: impl FnOnce() -> anyhow::Result<Option<String>>,
) -> Result<String, InterviewError> {
    if let Some(key) = env_value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        return Ok(key);
    }

    match keyring_lookup() {
        Ok(Some(key)) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        Ok(_) => Err(InterviewError::Configuration(format!(
            "no API key: set {API_KEY_ENV} or store one in the OS keyring"
        ))),
        Err(e) => {
            log::warn!("keyring lookup failed: {e:#}");
            Err(InterviewError::Configuration(format!(
                "no API key: set {API_KEY_ENV} (keyring unavailable: {e})"
            )))
        }
    }
}
