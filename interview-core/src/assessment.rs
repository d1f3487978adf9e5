use crate::text::{
    UNCERTAINTY_MARKERS, VAGUE_MARKERS, contains_marker, count_markers, sentence_count,
    word_count,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const STAR_GROUPS: [&[&str]; 4] = [
    // situation
    &[
        "situation",
        "context",
        "background",
        "at the time",
        "when i was",
        "at my previous",
        "in my last role",
    ],
    // task
    &[
        "task",
        "goal",
        "responsible for",
        "needed to",
        "objective",
        "challenge was",
        "my role was",
    ],
    // action
    &[
        "i decided",
        "i implemented",
        "i built",
        "i led",
        "i created",
        "i organized",
        "i worked with",
        "my approach",
        "steps",
    ],
    // result
    &[
        "result",
        "outcome",
        "as a result",
        "improved",
        "increased",
        "reduced",
        "achieved",
        "saved",
        "delivered",
    ],
];

const SPECIFICITY_MARKERS: &[&str] = &[
    "for example",
    "for instance",
    "specifically",
    "i implemented",
    "i designed",
    "i built",
    "i led",
    "percent",
    "we measured",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFlag {
    TooBrief,
    TooVerbose,
    Uncertain,
    VeryUncertain,
    Vague,
    StructuredAnswer,
    StrongAnswer,
    SpecificExamples,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseAssessment {
    pub word_count: usize,
    pub sentence_count: usize,
    /// 1..=10
    pub score: u8,
    pub flags: BTreeSet<ResponseFlag>,
    pub needs_follow_up: bool,
}

impl ResponseAssessment {
    pub fn has(&self, flag: ResponseFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Why the interviewer is probing the same question again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpReason {
    TooBrief,
    VeryUncertain,
    Vague,
    Confused,
    LowScore,
    Uncertain,
    NeedsSpecifics,
}

impl FollowUpReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FollowUpReason::TooBrief => "too_brief",
            FollowUpReason::VeryUncertain => "very_uncertain",
            FollowUpReason::Vague => "vague",
            FollowUpReason::Confused => "confused",
            FollowUpReason::LowScore => "low_score",
            FollowUpReason::Uncertain => "uncertain",
            FollowUpReason::NeedsSpecifics => "needs_specifics",
        }
    }

    /// Instruction handed to the model when composing the follow-up.
    pub fn describe(self) -> &'static str {
        match self {
            FollowUpReason::TooBrief => {
                "The answer was very short. Ask them to expand with more detail."
            }
            FollowUpReason::VeryUncertain | FollowUpReason::Uncertain => {
                "The candidate sounded unsure. Help them anchor the answer in something they actually did."
            }
            FollowUpReason::Vague => {
                "The answer was vague. Ask for one concrete situation and what they personally did."
            }
            FollowUpReason::Confused => {
                "The candidate seems confused by the question. Rephrase it more simply with an example."
            }
            FollowUpReason::LowScore => {
                "The answer lacked substance. Ask a focused question that draws out the missing detail."
            }
            FollowUpReason::NeedsSpecifics => {
                "The answer had no specific example. Ask for a specific example with a measurable outcome."
            }
        }
    }
}

pub fn assess_response(text: &str) -> ResponseAssessment {
    let words = word_count(text);
    let mut flags = BTreeSet::new();
    let mut score: i32 = 5;

    if words < 20 {
        flags.insert(ResponseFlag::TooBrief);
    } else if words > 150 {
        flags.insert(ResponseFlag::TooVerbose);
    }

    let uncertainty = count_markers(text, UNCERTAINTY_MARKERS);
    if uncertainty > 2 {
        score -= 2;
        flags.insert(ResponseFlag::Uncertain);
        flags.insert(ResponseFlag::VeryUncertain);
    } else if uncertainty >= 1 {
        score -= 1;
        flags.insert(ResponseFlag::Uncertain);
    }

    if words < 40 && contains_marker(text, VAGUE_MARKERS) {
        flags.insert(ResponseFlag::Vague);
    }

    if star_groups_matched(text) >= 3 {
        score += 2;
        flags.insert(ResponseFlag::StructuredAnswer);
    }

    if (40..=120).contains(&words) && uncertainty == 0 {
        score += 1;
        flags.insert(ResponseFlag::StrongAnswer);
    }

    if contains_marker(text, SPECIFICITY_MARKERS) {
        score += 1;
        flags.insert(ResponseFlag::SpecificExamples);
    }

    let needs_follow_up = flags.contains(&ResponseFlag::TooBrief)
        || flags.contains(&ResponseFlag::VeryUncertain)
        || flags.contains(&ResponseFlag::Vague);

    ResponseAssessment {
        word_count: words,
        sentence_count: sentence_count(text),
        score: score.clamp(1, 10) as u8,
        flags,
        needs_follow_up,
    }
}

fn star_groups_matched(text: &str) -> usize {
    STAR_GROUPS
        .iter()
        .filter(|group| contains_marker(text, group))
        .count()
}
