use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterviewError {
    #[error("generation service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("generation quota exhausted")]
    QuotaExhausted,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("could not decode model output: {0}")]
    Decode(String),
}
