//! Input/output gatekeeping for the dialogue.
//!
//! Candidate answers are checked before they reach the transcript, and generated
//! interviewer utterances are checked before they reach the candidate.

use crate::text::{char_len, collapse_whitespace, lowercase_words, truncate_chars, word_count};
use thiserror::Error;

pub const MIN_RESPONSE_CHARS: usize = 10;
pub const MAX_RESPONSE_CHARS: usize = 2000;
pub const MAX_QUESTION_CHARS: usize = 500;
pub const MIN_QUESTION_WORDS: usize = 5;

const TRUNCATION_MARKER: &str = "...";

const PROFANITY: &[&str] = &[
    "fuck", "shit", "damn", "bitch", "ass", "bastard", "crap", "piss", "dick", "cock", "pussy",
    "slut", "whore", "fag",
];

const COPIED_INDICATORS: &[&str] = &[
    "according to",
    "source:",
    "reference:",
    "cited from",
    "as stated in",
    "from the article",
    "the document says",
];

const REFUSAL_PATTERNS: &[&str] = &[
    "i cannot",
    "i can't",
    "i'm unable",
    "i apologize",
    "as an ai",
    "i don't have",
    "i'm not able",
    "it would be inappropriate",
    "i shouldn't",
];

const QUESTION_STARTERS: &[&str] = &[
    "tell me",
    "describe",
    "explain",
    "how do you",
    "what would",
    "can you",
    "could you",
    "walk me through",
    "give me an example",
    "share",
    "discuss",
    "elaborate",
];

const ERROR_WORDS: &[&str] = &["error", "failed", "exception", "timeout"];
const ERROR_PHRASES: &[&str] = &["rate limit", "quota exceeded", "service unavailable"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResponseRejection {
    #[error("Response cannot be empty.")]
    Empty,
    #[error("Response is too short. Please provide more detail.")]
    TooShort,
    #[error("Response is too long. Please keep it under 2000 characters.")]
    TooLong,
    #[error("Please keep your response professional and appropriate.")]
    Profanity,
    #[error("Response appears invalid. Please provide a meaningful answer.")]
    Gibberish,
    #[error("Please provide your own original response rather than copied content.")]
    Copied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuestionRejection {
    #[error("generated question is empty")]
    Empty,
    #[error("model refused to generate a question")]
    Refusal,
    #[error("generated text is not a question")]
    NotAQuestion,
    #[error("generated question is too short")]
    TooShort,
    #[error("generated question is too long")]
    TooLong,
    #[error("model produced an error message")]
    ErrorMessage,
}

pub fn validate_user_response(text: &str) -> Result<(), ResponseRejection> {
    if text.trim().is_empty() {
        return Err(ResponseRejection::Empty);
    }

    let len = char_len(text);
    if len < MIN_RESPONSE_CHARS {
        return Err(ResponseRejection::TooShort);
    }
    if len > MAX_RESPONSE_CHARS {
        return Err(ResponseRejection::TooLong);
    }

    if contains_profanity(text) {
        return Err(ResponseRejection::Profanity);
    }
    if is_gibberish(text) {
        return Err(ResponseRejection::Gibberish);
    }
    if looks_copied(text) {
        return Err(ResponseRejection::Copied);
    }

    Ok(())
}

/// Normalizes a candidate answer for storage.
///
/// Idempotent: the output never exceeds `MAX_RESPONSE_CHARS` and contains no
/// control characters or whitespace runs, so a second pass changes nothing.
pub fn sanitize_response(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    let collapsed = collapse_whitespace(&stripped);

    if char_len(&collapsed) <= MAX_RESPONSE_CHARS {
        return collapsed;
    }

    let keep = MAX_RESPONSE_CHARS - TRUNCATION_MARKER.len();
    let head = truncate_chars(&collapsed, keep).trim_end();
    format!("{head}{TRUNCATION_MARKER}")
}

pub fn validate_llm_question(text: &str) -> Result<(), QuestionRejection> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(QuestionRejection::Empty);
    }

    let lower = trimmed.to_lowercase().replace('\u{2019}', "'");
    if REFUSAL_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Err(QuestionRejection::Refusal);
    }
    if !contains_question_marker(&lower) {
        return Err(QuestionRejection::NotAQuestion);
    }
    if word_count(trimmed) < MIN_QUESTION_WORDS {
        return Err(QuestionRejection::TooShort);
    }
    if char_len(trimmed) > MAX_QUESTION_CHARS {
        return Err(QuestionRejection::TooLong);
    }
    if is_error_message(&lower) {
        return Err(QuestionRejection::ErrorMessage);
    }

    Ok(())
}

fn contains_profanity(text: &str) -> bool {
    lowercase_words(text)
        .iter()
        .any(|w| PROFANITY.contains(&w.as_str()))
}

fn is_gibberish(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 3 {
        return false;
    }

    let total = char_len(text);
    let symbols = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();
    if symbols as f64 / total as f64 > 0.3 {
        return true;
    }

    let avg_word_len =
        words.iter().map(|w| char_len(w)).sum::<usize>() as f64 / words.len() as f64;
    if !(2.0..=15.0).contains(&avg_word_len) {
        return true;
    }

    let unique: std::collections::HashSet<&str> = words.iter().copied().collect();
    (unique.len() as f64) < words.len() as f64 * 0.3
}

fn looks_copied(text: &str) -> bool {
    let lower = text.to_lowercase();
    if COPIED_INDICATORS.iter().any(|i| lower.contains(i)) {
        return true;
    }

    let clauses: Vec<&str> = text.split('.').collect();
    if clauses.len() > 5 {
        let long = clauses.iter().filter(|c| word_count(c) > 40).count();
        if long as f64 > clauses.len() as f64 * 0.5 {
            return true;
        }
    }

    false
}

fn contains_question_marker(lower: &str) -> bool {
    if lower.contains('?') {
        return true;
    }
    QUESTION_STARTERS
        .iter()
        .any(|s| lower.starts_with(s) || lower.contains(&format!(" {s}")))
}

fn is_error_message(lower: &str) -> bool {
    if ERROR_PHRASES.iter().any(|p| lower.contains(p)) {
        return true;
    }
    lowercase_words(lower)
        .iter()
        .any(|w| ERROR_WORDS.contains(&w.as_str()))
}
