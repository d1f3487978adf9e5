//! Generation Client: one logical generation call with retry, backoff,
//! rate-limit handling and structured-output decoding.
//!
//! Callers get `Option`s from [`GenerationClient::generate_text`] and
//! [`GenerationClient::generate_structured`]; `None` means the service is
//! unavailable and a local fallback must be used.

use crate::error::InterviewError;
use crate::traits::{OutputMode, TextGenerator};
use anyhow::anyhow;
use rand::Rng;
use interview_core::config::RetrySettings;
use interview_core::types::now_unix_ms;
use interview_providers::HttpStatusError;
use interview_providers::parse::extract_json_object;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

const QUOTA_MARKERS: &[&str] = &[
    "insufficient_quota",
    "quota exceeded",
    "exceeded your current quota",
    "billing",
    "payment required",
];

const RATE_LIMIT_MARKERS: &[&str] = &["rate limit", "rate_limit", "too many requests"];

const TRANSIENT_MARKERS: &[&str] = &[
    "timeout",
    "timed out",
    "connection",
    "error sending request",
    "temporarily unavailable",
    "network",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub rate_limit_penalty: Duration,
    pub max_rate_limit_waits: u32,
    pub min_spacing: Duration,
    /// Each backoff gets a uniform random extra delay in `0..=max_jitter`.
    pub max_jitter: Duration,
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(s: &RetrySettings) -> Self {
        Self {
            max_attempts: s.max_attempts.max(1),
            base_delay: Duration::from_millis(s.base_delay_ms),
            rate_limit_penalty: Duration::from_millis(s.rate_limit_penalty_ms),
            max_rate_limit_waits: s.max_rate_limit_waits,
            min_spacing: Duration::from_millis(s.min_spacing_ms),
            max_jitter: Duration::from_millis(s.max_jitter_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl RetryPolicy {
    /// No sleeping anywhere; used by tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::ZERO,
            rate_limit_penalty: Duration::ZERO,
            max_rate_limit_waits: 3,
            min_spacing: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Delay after the failed attempt `attempt` (0-based): `base * 2^attempt`
    /// plus random jitter up to `max_jitter`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1u32 << attempt.min(16));
        let max_jitter_ms = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        if max_jitter_ms == 0 {
            return exp;
        }
        let jitter = rand::thread_rng().gen_range(0..=max_jitter_ms);
        exp.saturating_add(Duration::from_millis(jitter))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    QuotaExhausted,
    Transient,
    Other,
}

pub fn classify_failure(err: &anyhow::Error) -> FailureKind {
    if let Some(InterviewError::Decode(_)) = err.downcast_ref::<InterviewError>() {
        return FailureKind::Other;
    }

    if let Some(http) = err.downcast_ref::<HttpStatusError>() {
        let body = http.body.to_lowercase();
        let quota = QUOTA_MARKERS.iter().any(|m| body.contains(m));
        return match http.status {
            402 => FailureKind::QuotaExhausted,
            429 if quota => FailureKind::QuotaExhausted,
            429 => FailureKind::RateLimited,
            408 | 500..=599 => FailureKind::Transient,
            _ if quota => FailureKind::QuotaExhausted,
            _ => FailureKind::Other,
        };
    }

    let message = format!("{err:#}").to_lowercase();
    if QUOTA_MARKERS.iter().any(|m| message.contains(m)) {
        FailureKind::QuotaExhausted
    } else if RATE_LIMIT_MARKERS.iter().any(|m| message.contains(m)) {
        FailureKind::RateLimited
    } else if TRANSIENT_MARKERS.iter().any(|m| message.contains(m)) {
        FailureKind::Transient
    } else {
        FailureKind::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub last_request_unix_ms: Option<i64>,
}

pub struct GenerationClient {
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
    next_slot: Mutex<Option<Instant>>,
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    last_request_unix_ms: AtomicI64,
}

// `dyn TextGenerator` has no `Debug` bound; it shows up as the trailing `..`.
impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("policy", &self.policy)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl GenerationClient {
    pub fn new(generator: Arc<dyn TextGenerator>, policy: RetryPolicy) -> Self {
        Self {
            generator,
            policy,
            next_slot: Mutex::new(None),
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            last_request_unix_ms: AtomicI64::new(0),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn stats(&self) -> ClientStats {
        let last = self.last_request_unix_ms.load(Ordering::Relaxed);
        ClientStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            last_request_unix_ms: (last > 0).then_some(last),
        }
    }

    /// Free-text completion, or `None` once retries are exhausted.
    pub async fn generate_text(&self, prompt: &str) -> Option<String> {
        match self.generate(prompt, OutputMode::Text).await {
            Ok(text) => Some(text),
            Err(e) => {
                log::error!("text generation gave up: {e}");
                None
            }
        }
    }

    /// A decoded JSON object, or `None` once retries are exhausted.
    ///
    /// Output that does not decode to an object counts as a failed attempt.
    pub async fn generate_structured(&self, prompt: &str) -> Option<serde_json::Value> {
        match self.generate_json(prompt).await {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("structured generation gave up: {e}");
                None
            }
        }
    }

    pub async fn generate(&self, prompt: &str, mode: OutputMode) -> Result<String, InterviewError> {
        self.run_with_retry(prompt, mode, Ok).await
    }

    pub async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, InterviewError> {
        self.run_with_retry(prompt, OutputMode::Structured, |text| {
            extract_json_object(&text)
                .map_err(|e| anyhow::Error::from(InterviewError::Decode(format!("{e:#}"))))
        })
        .await
    }

    async fn run_with_retry<T>(
        &self,
        prompt: &str,
        mode: OutputMode,
        decode: impl Fn(String) -> anyhow::Result<T>,
    ) -> Result<T, InterviewError> {
        let mut failures = 0u32;
        let mut rate_limit_waits = 0u32;
        let mut last_reason = String::from("no attempt made");

        while failures < self.policy.max_attempts {
            self.wait_for_slot().await;
            self.total_requests.fetch_add(1, Ordering::Relaxed);
            self.last_request_unix_ms
                .store(now_unix_ms(), Ordering::Relaxed);

            let attempt = failures + 1;
            log::debug!(
                "generation attempt {attempt}/{} ({mode:?})",
                self.policy.max_attempts
            );

            let outcome = match self.generator.generate(prompt, mode).await {
                Ok(text) if text.trim().is_empty() => Err(anyhow!("empty response from model")),
                Ok(text) => decode(text),
                Err(e) => Err(e),
            };

            let err = match outcome {
                Ok(value) => {
                    self.successful_requests.fetch_add(1, Ordering::Relaxed);
                    return Ok(value);
                }
                Err(e) => e,
            };

            let kind = classify_failure(&err);
            log::warn!("generation attempt {attempt} failed ({kind:?}): {err:#}");
            last_reason = format!("{err:#}");

            match kind {
                FailureKind::QuotaExhausted => return Err(InterviewError::QuotaExhausted),
                FailureKind::RateLimited if rate_limit_waits < self.policy.max_rate_limit_waits => {
                    rate_limit_waits += 1;
                    log::warn!(
                        "rate limited; waiting {:?} before retrying ({rate_limit_waits}/{})",
                        self.policy.rate_limit_penalty,
                        self.policy.max_rate_limit_waits
                    );
                    sleep(self.policy.rate_limit_penalty).await;
                    continue;
                }
                _ => {}
            }

            failures += 1;
            if failures < self.policy.max_attempts {
                let delay = self.policy.backoff_delay(failures - 1);
                log::info!("retrying generation in {delay:?}");
                sleep(delay).await;
            }
        }

        Err(InterviewError::ServiceUnavailable {
            reason: last_reason,
        })
    }

    /// Enforces the minimum spacing between consecutive requests of this client.
    async fn wait_for_slot(&self) {
        let wait = {
            let mut slot = self
                .next_slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let start = slot.map_or(now, |next| next.max(now));
            *slot = Some(start + self.policy.min_spacing);
            start - now
        };
        if !wait.is_zero() {
            log::debug!("spacing requests; sleeping {wait:?}");
            sleep(wait).await;
        }
    }
}

async fn sleep(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}
