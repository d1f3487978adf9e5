//! Behavioral labelling of the candidate.
//!
//! Two tracks exist. [`HeuristicPersonaTracker`] derives a [`Persona`] from local
//! lexical statistics; [`LlmPersonaTracker`] records the richer [`AssessedPersona`]
//! returned by a model judgment. Both feed an engagement score surfaced to the UI.

use crate::text::{
    FILLER_PHRASES, UNCERTAINTY_MARKERS, clause_count, count_markers, count_occurrences,
    word_count,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Confused,
    Efficient,
    Chatty,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssessedPersona {
    Professional,
    Efficient,
    Chatty,
    Nervous,
    Evasive,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncouragementLevel {
    Low,
    Moderate,
    High,
}

/// How the interviewer should pace and phrase the next utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InteractionStrategy {
    pub approach: &'static str,
    pub guidance: &'static str,
    /// 0..1 propensity to ask a follow-up before moving on.
    pub follow_up_threshold: f64,
    pub question_style: &'static str,
    pub encouragement_level: EncouragementLevel,
}

impl Persona {
    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Confused => "confused",
            Persona::Efficient => "efficient",
            Persona::Chatty => "chatty",
            Persona::Normal => "normal",
        }
    }

    pub fn interaction_strategy(self) -> InteractionStrategy {
        match self {
            Persona::Confused => InteractionStrategy {
                approach: "supportive",
                guidance: "The candidate seems uncertain. Ask a clarifying question with an example to guide them.",
                follow_up_threshold: 0.8,
                question_style: "simple, concrete, one idea at a time",
                encouragement_level: EncouragementLevel::High,
            },
            Persona::Efficient => InteractionStrategy {
                approach: "brisk",
                guidance: "The candidate is concise. Ask a brief follow-up only if critical information is missing.",
                follow_up_threshold: 0.2,
                question_style: "direct and challenging",
                encouragement_level: EncouragementLevel::Low,
            },
            Persona::Chatty => InteractionStrategy {
                approach: "focused",
                guidance: "Acknowledge their response and redirect to the core question.",
                follow_up_threshold: 0.3,
                question_style: "narrow and specific, ask for one example",
                encouragement_level: EncouragementLevel::Moderate,
            },
            Persona::Normal => InteractionStrategy {
                approach: "conversational",
                guidance: "Ask a natural follow-up to explore deeper or get specific examples.",
                follow_up_threshold: 0.5,
                question_style: "open-ended behavioral",
                encouragement_level: EncouragementLevel::Moderate,
            },
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AssessedPersona {
    pub fn as_str(self) -> &'static str {
        match self {
            AssessedPersona::Professional => "Professional",
            AssessedPersona::Efficient => "Efficient",
            AssessedPersona::Chatty => "Chatty",
            AssessedPersona::Nervous => "Nervous",
            AssessedPersona::Evasive => "Evasive",
            AssessedPersona::Neutral => "Neutral",
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, AssessedPersona::Professional | AssessedPersona::Efficient)
    }

    pub fn is_negative(self) -> bool {
        matches!(self, AssessedPersona::Evasive | AssessedPersona::Nervous)
    }

    /// Heuristic label that drives the follow-up rules for this assessment.
    pub fn as_heuristic(self) -> Persona {
        match self {
            AssessedPersona::Nervous => Persona::Confused,
            AssessedPersona::Efficient => Persona::Efficient,
            AssessedPersona::Chatty => Persona::Chatty,
            AssessedPersona::Professional | AssessedPersona::Evasive | AssessedPersona::Neutral => {
                Persona::Normal
            }
        }
    }

    pub fn interaction_strategy(self) -> InteractionStrategy {
        match self {
            AssessedPersona::Professional => InteractionStrategy {
                approach: "peer-level",
                guidance: "The candidate is composed and substantive. Raise the difficulty and probe trade-offs.",
                follow_up_threshold: 0.4,
                question_style: "scenario-based with constraints",
                encouragement_level: EncouragementLevel::Low,
            },
            AssessedPersona::Efficient => Persona::Efficient.interaction_strategy(),
            AssessedPersona::Chatty => Persona::Chatty.interaction_strategy(),
            AssessedPersona::Nervous => InteractionStrategy {
                approach: "reassuring",
                guidance: "The candidate seems nervous. Acknowledge what went well and ask an easier, concrete question.",
                follow_up_threshold: 0.7,
                question_style: "warm, simple, concrete",
                encouragement_level: EncouragementLevel::High,
            },
            AssessedPersona::Evasive => InteractionStrategy {
                approach: "persistent",
                guidance: "The candidate is avoiding specifics. Politely ask for one concrete example with a measurable outcome.",
                follow_up_threshold: 0.9,
                question_style: "pointed, evidence-seeking",
                encouragement_level: EncouragementLevel::Moderate,
            },
            AssessedPersona::Neutral => Persona::Normal.interaction_strategy(),
        }
    }
}

impl fmt::Display for AssessedPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown persona label: {0}")]
pub struct UnknownPersona(pub String);

impl FromStr for AssessedPersona {
    type Err = UnknownPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(AssessedPersona::Professional),
            "efficient" => Ok(AssessedPersona::Efficient),
            "chatty" => Ok(AssessedPersona::Chatty),
            "nervous" => Ok(AssessedPersona::Nervous),
            "evasive" => Ok(AssessedPersona::Evasive),
            "neutral" => Ok(AssessedPersona::Neutral),
            _ => Err(UnknownPersona(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeuristicPersonaTracker {
    response_lengths: Vec<usize>,
    uncertainty_count: usize,
    history: Vec<Persona>,
}

impl HeuristicPersonaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `response` and returns the persona implied by the history so far.
    pub fn analyze_response(&mut self, response: &str) -> Persona {
        let words = word_count(response);
        let markers = count_markers(response, UNCERTAINTY_MARKERS);

        self.response_lengths.push(words);
        if markers > 0 {
            self.uncertainty_count += 1;
        }

        let persona = if self.response_lengths.len() == 1 {
            if words < 20 {
                Persona::Efficient
            } else if words > 150 {
                Persona::Chatty
            } else if markers > 1 {
                Persona::Confused
            } else {
                Persona::Normal
            }
        } else {
            let avg = self.average_length();
            let ratio = self.uncertainty_ratio();
            if ratio > 0.5 && avg < 40.0 {
                Persona::Confused
            } else if avg < 30.0 && ratio < 0.3 {
                Persona::Efficient
            } else if avg > 120.0 && is_rambling(response) {
                Persona::Chatty
            } else {
                Persona::Normal
            }
        };

        self.history.push(persona);
        persona
    }

    pub fn current(&self) -> Option<Persona> {
        self.history.last().copied()
    }

    pub fn history(&self) -> &[Persona] {
        &self.history
    }

    pub fn average_length(&self) -> f64 {
        average(&self.response_lengths)
    }

    pub fn uncertainty_ratio(&self) -> f64 {
        if self.response_lengths.is_empty() {
            return 0.0;
        }
        self.uncertainty_count as f64 / self.response_lengths.len() as f64
    }

    /// Engagement in [0, 1], rounded to two decimals. 0.5 before any response.
    pub fn engagement_score(&self) -> f64 {
        if self.response_lengths.is_empty() {
            return 0.5;
        }

        let avg = self.average_length();
        let consistency = if avg > 0.0 {
            (1.0 - std_dev(&self.response_lengths) / avg).max(0.0)
        } else {
            0.0
        };

        let score = 0.4 * (avg / 80.0).min(1.0)
            + 0.4 * (1.0 - self.uncertainty_ratio())
            + 0.2 * consistency;
        round2(score.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone)]
pub struct LlmPersonaTracker {
    current: AssessedPersona,
    history: Vec<AssessedPersona>,
    response_lengths: Vec<usize>,
    engagement: f64,
}

impl Default for LlmPersonaTracker {
    fn default() -> Self {
        Self {
            current: AssessedPersona::Neutral,
            history: vec![],
            response_lengths: vec![],
            engagement: 0.5,
        }
    }
}

impl LlmPersonaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_from_analysis(&mut self, persona: AssessedPersona, response: &str) {
        self.current = persona;
        self.history.push(persona);
        self.response_lengths.push(word_count(response));

        let mut score: f64 = 0.5;
        if persona.is_positive() {
            score += 0.3;
        } else if persona.is_negative() {
            score -= 0.2;
        }
        if (40.0..=150.0).contains(&average(&self.response_lengths)) {
            score += 0.1;
        }
        self.engagement = round2(score.clamp(0.1, 1.0));
    }

    pub fn current(&self) -> AssessedPersona {
        self.current
    }

    pub fn history(&self) -> &[AssessedPersona] {
        &self.history
    }

    pub fn engagement_score(&self) -> f64 {
        self.engagement
    }
}

fn is_rambling(response: &str) -> bool {
    let clauses = clause_count(response);
    if clauses < 3 {
        return false;
    }
    count_occurrences(response, FILLER_PHRASES) >= 3 || clauses > 8
}

fn average(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<usize>() as f64 / values.len() as f64
}

fn std_dev(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = average(values);
    let var = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    var.sqrt()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn first_short_answer_is_efficient() {
        let mut t = HeuristicPersonaTracker::new();
        assert_eq!(
            t.analyze_response("I built the API and shipped it in two weeks."),
            Persona::Efficient
        );
    }

    #[test]
    fn first_long_answer_is_chatty() {
        let mut t = HeuristicPersonaTracker::new();
        assert_eq!(t.analyze_response(&words(200)), Persona::Chatty);
    }

    #[test]
    fn first_hedged_answer_is_confused() {
        let mut t = HeuristicPersonaTracker::new();
        let answer = format!("{} maybe, I'm not sure, I guess it depends", words(25));
        assert_eq!(t.analyze_response(&answer), Persona::Confused);
    }

    #[test]
    fn single_hedge_on_first_answer_stays_normal() {
        let mut t = HeuristicPersonaTracker::new();
        let answer = format!("{} I'm not sure it scaled", words(23));
        assert_eq!(t.analyze_response(&answer), Persona::Normal);
    }

    #[test]
    fn running_uncertainty_becomes_confused() {
        let mut t = HeuristicPersonaTracker::new();
        t.analyze_response(&format!("{} maybe", words(30)));
        let p = t.analyze_response(&format!("{} I don't know", words(30)));
        assert_eq!(p, Persona::Confused);
        assert_eq!(t.uncertainty_ratio(), 1.0);
    }

    #[test]
    fn long_answers_without_rambling_stay_normal() {
        let mut t = HeuristicPersonaTracker::new();
        t.analyze_response(&words(130));
        assert_eq!(t.analyze_response(&words(130)), Persona::Normal);
    }

    #[test]
    fn long_rambling_answers_are_chatty() {
        let mut t = HeuristicPersonaTracker::new();
        t.analyze_response(&words(130));
        let rambling = format!(
            "{}, you know, basically, and also, {}, you know.",
            words(60),
            words(60)
        );
        assert_eq!(t.analyze_response(&rambling), Persona::Chatty);
    }

    #[test]
    fn engagement_rewards_consistent_confident_answers() {
        let mut t = HeuristicPersonaTracker::new();
        assert_eq!(t.engagement_score(), 0.5);
        t.analyze_response(&words(80));
        t.analyze_response(&words(80));
        assert_eq!(t.engagement_score(), 1.0);
    }

    #[test]
    fn engagement_is_bounded_and_rounded() {
        let mut t = HeuristicPersonaTracker::new();
        t.analyze_response("maybe I think so, not sure really");
        t.analyze_response(&words(200));
        let s = t.engagement_score();
        assert!((0.0..=1.0).contains(&s));
        assert_eq!(s, (s * 100.0).round() / 100.0);
    }

    #[test]
    fn llm_track_scores_by_label() {
        let mut t = LlmPersonaTracker::new();
        t.update_from_analysis(AssessedPersona::Professional, &words(60));
        assert_eq!(t.engagement_score(), 0.9);
        t.update_from_analysis(AssessedPersona::Evasive, &words(5));
        assert_eq!(t.engagement_score(), 0.3);
        assert_eq!(t.current(), AssessedPersona::Evasive);
    }

    #[test]
    fn assessed_persona_parses_known_labels_only() {
        assert_eq!("professional".parse(), Ok(AssessedPersona::Professional));
        assert!("Expert".parse::<AssessedPersona>().is_err());
    }
}
