use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

use crate::text::truncate_chars;

/// Dimensions every report scores, 0..=100.
pub const REPORT_DIMENSIONS: &[&str] = &["communication", "technical", "behavioral", "cultural_fit"];
pub const OVERALL: &str = "overall";
pub const DEFAULT_SCORE: u8 = 50;
pub const PENDING_REVIEW: &str = "Pending Review";

const SUMMARY_MAX_CHARS: usize = 600;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub coach_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub claim: String,
    pub verdict: String,
    #[serde(default)]
    pub quote: String,
}

/// Which degradation tier produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Structured,
    ScrapedText,
    StaticDefault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub scores: BTreeMap<String, u8>,
    pub feedback: Feedback,
    pub evidence: Vec<EvidenceItem>,
    pub hiring_decision: String,
    pub executive_summary: String,
    pub source: ReportSource,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportDecodeError {
    #[error("report is not a JSON object")]
    NotAnObject,
    #[error("report has no usable scores")]
    MissingScores,
    #[error("report shape is invalid: {0}")]
    Malformed(String),
}

#[derive(Deserialize)]
struct RawReport {
    #[serde(default)]
    scores: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    feedback: Feedback,
    #[serde(default)]
    evidence: Vec<EvidenceItem>,
    #[serde(default)]
    hiring_decision: Option<String>,
    #[serde(default)]
    executive_summary: Option<String>,
}

fn score_patterns() -> &'static [(&'static str, Regex)] {
    static RE: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            ("communication", r"(?i)Communication.*?:?\s*(\d+)\s*/\s*100"),
            ("technical", r"(?i)Technical.*?:?\s*(\d+)\s*/\s*100"),
            ("behavioral", r"(?i)Behaviou?ral.*?:?\s*(\d+)\s*/\s*100"),
            ("cultural_fit", r"(?i)Cultur(?:e|al).*?:?\s*(\d+)\s*/\s*100"),
            (OVERALL, r"(?i)Overall.*?:?\s*(\d+)\s*/\s*100"),
        ]
        .into_iter()
        .map(|(dim, pat)| (dim, Regex::new(pat).expect("valid score regex")))
        .collect()
    })
}

fn decision_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:decision|recommendation)\W*(strong no hire|strong hire|lean no hire|lean hire|no hire|hire)\b",
        )
        .expect("valid decision regex")
    })
}

fn summary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)summary\W*\n?\s*(.+?)(?:\n\s*\n|\z)").expect("valid summary regex")
    })
}

impl EvaluationReport {
    /// Last-resort report: every score is `DEFAULT_SCORE`, decision pending.
    pub fn static_default() -> Self {
        let mut scores: BTreeMap<String, u8> = REPORT_DIMENSIONS
            .iter()
            .map(|d| (d.to_string(), DEFAULT_SCORE))
            .collect();
        scores.insert(OVERALL.into(), DEFAULT_SCORE);

        Self {
            scores,
            feedback: Feedback {
                strengths: vec![],
                weaknesses: vec![],
                coach_tips: vec![
                    "Automated feedback was unavailable for this session; review the transcript manually."
                        .into(),
                ],
            },
            evidence: vec![],
            hiring_decision: PENDING_REVIEW.into(),
            executive_summary: "The evaluation service was unavailable. Scores are placeholders pending review."
                .into(),
            source: ReportSource::StaticDefault,
        }
    }

    /// Decodes a model-produced JSON object.
    pub fn from_structured(value: &serde_json::Value) -> Result<Self, ReportDecodeError> {
        if !value.is_object() {
            return Err(ReportDecodeError::NotAnObject);
        }
        let raw: RawReport = serde_json::from_value(value.clone())
            .map_err(|e| ReportDecodeError::Malformed(e.to_string()))?;

        let mut scores = BTreeMap::new();
        for (key, v) in &raw.scores {
            if let Some(score) = numeric_score(v) {
                scores.insert(normalize_dimension(key), score);
            }
        }
        if scores.is_empty() {
            return Err(ReportDecodeError::MissingScores);
        }
        fill_overall(&mut scores);

        Ok(Self {
            scores,
            feedback: raw.feedback,
            evidence: raw.evidence,
            hiring_decision: raw
                .hiring_decision
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| PENDING_REVIEW.into()),
            executive_summary: raw.executive_summary.unwrap_or_default(),
            source: ReportSource::Structured,
        })
    }

    /// Recovers whatever scores free text exposes as `<Dimension>...: NN/100`.
    ///
    /// Returns `None` when no score pattern matches. Dimensions that are not
    /// found keep `DEFAULT_SCORE`.
    pub fn scrape_from_text(text: &str) -> Option<Self> {
        let mut report = Self::static_default();
        report.scores.remove(OVERALL);

        let mut found = 0;
        for (dim, re) in score_patterns() {
            let score = re
                .captures(text)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok());
            if let Some(score) = score {
                report.scores.insert(dim.to_string(), score.min(100) as u8);
                found += 1;
            }
        }
        if found == 0 {
            return None;
        }
        fill_overall(&mut report.scores);

        report.hiring_decision = decision_re()
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| canonical_decision(m.as_str()))
            .unwrap_or_else(|| PENDING_REVIEW.into());

        let summary = summary_re()
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or_else(|| text.trim().split("\n\n").next().unwrap_or_default());
        report.executive_summary = truncate_chars(summary.trim(), SUMMARY_MAX_CHARS).to_string();

        report.feedback = Feedback::default();
        report.source = ReportSource::ScrapedText;
        Some(report)
    }

    pub fn overall(&self) -> u8 {
        self.scores.get(OVERALL).copied().unwrap_or(DEFAULT_SCORE)
    }
}

fn numeric_score(v: &serde_json::Value) -> Option<u8> {
    let n = match v {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().trim_end_matches("/100").trim().parse().ok()?,
        _ => return None,
    };
    Some(n.round().clamp(0.0, 100.0) as u8)
}

fn normalize_dimension(key: &str) -> String {
    key.trim().to_lowercase().replace([' ', '-'], "_")
}

fn fill_overall(scores: &mut BTreeMap<String, u8>) {
    if scores.contains_key(OVERALL) || scores.is_empty() {
        return;
    }
    let sum: u32 = scores.values().map(|&s| s as u32).sum();
    let mean = (sum as f64 / scores.len() as f64).round() as u8;
    scores.insert(OVERALL.into(), mean);
}

fn canonical_decision(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "strong hire" => "Strong Hire",
        "strong no hire" => "Strong No Hire",
        "lean hire" => "Lean Hire",
        "lean no hire" => "Lean No Hire",
        "no hire" => "No Hire",
        _ => "Hire",
    }
    .to_string()
}
