use thiserror::Error;

/// A non-2xx reply from the generation endpoint.
///
/// Travels inside `anyhow::Error` so callers can recover the status by downcasting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("generation request failed: status={status} body={body}")]
pub struct HttpStatusError {
    pub status: u16,
    pub body: String,
}

impl HttpStatusError {
    pub fn new(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}
