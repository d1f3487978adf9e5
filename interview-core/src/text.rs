use regex::Regex;
use std::sync::OnceLock;

/// Phrases that signal the candidate is unsure of their answer.
pub const UNCERTAINTY_MARKERS: &[&str] = &[
    "i'm not sure",
    "i am not sure",
    "not sure",
    "i don't know",
    "i dont know",
    "maybe",
    "probably",
    "i think",
    "i guess",
    "perhaps",
    "i'm not certain",
];

/// Hedging phrases that make an answer vague when it is also short.
pub const VAGUE_MARKERS: &[&str] = &[
    "kind of",
    "sort of",
    "somewhat",
    "a bit",
    "stuff like that",
    "things like that",
    "and so on",
];

/// Filler phrases typical of rambling answers.
pub const FILLER_PHRASES: &[&str] = &[
    "and also",
    "you know",
    "basically",
    "like i said",
    "anyway",
    "i mean",
    "so yeah",
    "actually",
    "literally",
];

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("valid word regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn marker_noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Everything that is not a word character or an apostrophe separates tokens.
    RE.get_or_init(|| Regex::new(r"[^\w']+").expect("valid marker noise regex"))
}

fn thinking_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<thinking>.*?</thinking>|<think>.*?</think>|<reasoning>.*?</reasoning>")
            .expect("valid thinking regex")
    })
}

fn speaker_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*(\*\*)?interviewer(\*\*)?\s*:\s*").expect("valid prefix regex"))
}

/// Number of characters (not bytes).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text, " ").trim().to_string()
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased `\w+` tokens.
pub fn lowercase_words(text: &str) -> Vec<String> {
    word_re()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

pub fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
}

pub fn clause_count(text: &str) -> usize {
    text.split(['.', ',', ';', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
}

fn marker_tokens(text: &str) -> Vec<String> {
    let lower = text.to_lowercase().replace('\u{2019}', "'");
    marker_noise_re()
        .replace_all(&lower, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Non-overlapping phrase hits, scanning left to right.
///
/// At each position the longest matching phrase wins and its words are
/// consumed, so "i'm not sure" never also counts as "not sure".
fn marker_hits<'m>(text: &str, markers: &[&'m str]) -> Vec<&'m str> {
    let tokens = marker_tokens(text);
    let mut phrases: Vec<(&'m str, Vec<&str>)> = markers
        .iter()
        .map(|m| (*m, m.split_whitespace().collect::<Vec<_>>()))
        .filter(|(_, words)| !words.is_empty())
        .collect();
    phrases.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut hits = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let found = phrases.iter().find(|(_, words)| {
            tokens.len() - i >= words.len()
                && words.iter().zip(&tokens[i..]).all(|(w, t)| *w == t.as_str())
        });
        match found {
            Some((marker, words)) => {
                hits.push(*marker);
                i += words.len();
            }
            None => i += 1,
        }
    }
    hits
}

/// Counts how many distinct `markers` occur in `text` as whole-word phrases.
pub fn count_markers(text: &str, markers: &[&str]) -> usize {
    let mut hits = marker_hits(text, markers);
    hits.sort_unstable();
    hits.dedup();
    hits.len()
}

pub fn contains_marker(text: &str, markers: &[&str]) -> bool {
    !marker_hits(text, markers).is_empty()
}

/// Counts every occurrence (not just distinct ones) of `phrases` in `text`.
pub fn count_occurrences(text: &str, phrases: &[&str]) -> usize {
    marker_hits(text, phrases).len()
}

/// Cleans raw model output before it is shown to the candidate.
///
/// Strips reasoning blocks, a leading "Interviewer:" label and wrapping quotes.
pub fn clean_model_output(text: &str) -> String {
    let out = thinking_re().replace_all(text, "");
    let out = speaker_prefix_re().replace(out.trim(), "");
    let out = out.trim();
    let out = out
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(out);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_match_whole_phrases_only() {
        assert_eq!(count_markers("Maybe, I think so.", UNCERTAINTY_MARKERS), 2);
        assert_eq!(count_markers("Maybelline is a brand", UNCERTAINTY_MARKERS), 0);
        assert_eq!(count_markers("I\u{2019}m not sure", &["i'm not sure"]), 1);
    }

    #[test]
    fn longer_hedge_is_counted_once() {
        assert_eq!(count_markers("I'm not sure.", UNCERTAINTY_MARKERS), 1);
        assert_eq!(count_markers("I am not sure about that", UNCERTAINTY_MARKERS), 1);
        assert_eq!(count_markers("I'm not sure, maybe we shipped it", UNCERTAINTY_MARKERS), 2);
        assert_eq!(count_markers("Not sure, honestly.", UNCERTAINTY_MARKERS), 1);
    }

    #[test]
    fn adjacent_repeats_are_all_counted() {
        assert_eq!(
            count_occurrences("basically basically basically it shipped", FILLER_PHRASES),
            3
        );
        assert_eq!(count_occurrences("you know you know", FILLER_PHRASES), 2);
    }

    #[test]
    fn occurrences_count_repeats() {
        let text = "You know, basically it was, you know, basically fine.";
        assert_eq!(count_occurrences(text, FILLER_PHRASES), 4);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[test]
    fn clean_output_strips_labels_and_quotes() {
        let raw = "<think>plan</think>\nInterviewer: \"How do you test your code?\"";
        assert_eq!(clean_model_output(raw), "How do you test your code?");
    }

    #[test]
    fn counts_sentences_and_clauses() {
        assert_eq!(sentence_count("One. Two! Three?"), 3);
        assert_eq!(clause_count("a, b; c. d"), 4);
    }
}
