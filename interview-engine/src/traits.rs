use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    /// The reply must be a single JSON object.
    Structured,
}

/// A single-prompt text generation backend.
///
/// Implementations report every failure as an error; retry and fallback policy
/// lives in [`crate::client::GenerationClient`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, mode: OutputMode) -> anyhow::Result<String>;
}
