use crate::text::{char_len, lowercase_words};
use crate::types::Turn;
use std::collections::HashSet;

/// How many trailing transcript turns (current answer included) are inspected.
pub const REPETITION_WINDOW: usize = 6;

const MIN_COMPARABLE_CHARS: usize = 100;
const LEXICAL_THRESHOLD: f64 = 0.70;
const PHRASE_THRESHOLD: f64 = 0.65;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "was", "were", "are", "but", "not", "you",
    "your", "have", "had", "has", "from", "they", "them", "then", "there", "their", "what",
    "when", "which", "who", "will", "would", "could", "should", "about", "into", "than", "also",
    "just", "very", "really", "some", "any", "all", "our", "out", "can", "did", "does", "been",
    "being", "its", "it's", "i'm", "because", "while", "where", "how", "more", "most", "such",
];

/// Jaccard similarity of the lowercase word sets of `a` and `b`.
pub fn lexical_similarity(a: &str, b: &str) -> f64 {
    let wa: HashSet<String> = lowercase_words(a).into_iter().collect();
    let wb: HashSet<String> = lowercase_words(b).into_iter().collect();
    jaccard(&wa, &wb)
}

/// Jaccard similarity of the bigram+trigram sets of the content words of `a` and `b`.
pub fn phrase_similarity(a: &str, b: &str) -> f64 {
    jaccard(&ngrams(&content_words(a)), &ngrams(&content_words(b)))
}

/// True when `current` substantially repeats a prior candidate answer.
///
/// `preceding` holds the turns before `current`; only the candidate turns among
/// the last `REPETITION_WINDOW - 1` of them are compared.
pub fn is_repetitive(current: &str, preceding: &[Turn]) -> bool {
    if char_len(current) <= MIN_COMPARABLE_CHARS {
        return false;
    }

    let start = preceding.len().saturating_sub(REPETITION_WINDOW - 1);
    preceding[start..]
        .iter()
        .filter(|t| t.is_candidate() && char_len(&t.text) > MIN_COMPARABLE_CHARS)
        .any(|t| {
            lexical_similarity(&t.text, current) > LEXICAL_THRESHOLD
                || phrase_similarity(&t.text, current) > PHRASE_THRESHOLD
        })
}

fn content_words(text: &str) -> Vec<String> {
    lowercase_words(text)
        .into_iter()
        .filter(|w| char_len(w) > 2 && !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

fn ngrams(words: &[String]) -> HashSet<String> {
    let mut out = HashSet::new();
    for n in [2, 3] {
        for window in words.windows(n) {
            out.insert(window.join(" "));
        }
    }
    out
}

fn jaccard<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count();
    let union = a.union(b).count();
    inter as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(prefix: &str, n: usize) -> String {
        (0..n)
            .map(|i| format!("{prefix}{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn identical_long_answers_repeat() {
        let text = numbered_words("alpha", 150);
        assert!(is_repetitive(&text, &[Turn::candidate(text.clone())]));
    }

    #[test]
    fn disjoint_long_answers_do_not_repeat() {
        let a = numbered_words("alpha", 150);
        let b = numbered_words("omega", 150);
        assert!(!is_repetitive(&b, &[Turn::candidate(a)]));
    }

    #[test]
    fn ignores_interviewer_turns_and_short_texts() {
        let text = numbered_words("alpha", 150);
        assert!(!is_repetitive(&text, &[Turn::interviewer(text.clone())]));
        assert!(!is_repetitive("short answer", &[Turn::candidate("short answer")]));
    }

    #[test]
    fn only_recent_window_is_compared() {
        let text = numbered_words("alpha", 150);
        let mut preceding = vec![Turn::candidate(text.clone())];
        for i in 0..REPETITION_WINDOW {
            preceding.push(Turn::interviewer(format!("question {i}")));
        }
        assert!(!is_repetitive(&text, &preceding));
    }

    #[test]
    fn paraphrase_with_shared_phrases_is_caught() {
        let a = "In my last role I rebuilt the payment reconciliation pipeline, \
                 migrated the nightly batch jobs to streaming consumers, and added \
                 alerting dashboards for settlement failures across regions.";
        let b = "So basically, at my last role I rebuilt the payment reconciliation \
                 pipeline, migrated nightly batch jobs to streaming consumers, then \
                 added alerting dashboards for settlement failures across all regions.";
        assert!(phrase_similarity(a, b) > 0.65);
        assert!(is_repetitive(b, &[Turn::candidate(a)]));
    }

    #[test]
    fn similarity_of_empty_text_is_zero() {
        assert_eq!(lexical_similarity("", "anything"), 0.0);
        assert_eq!(phrase_similarity("a b", "a b"), 0.0);
    }
}
