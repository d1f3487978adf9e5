//! Role catalog: interview categories, question banks, canned fallbacks and the
//! scoring rubric for each supported job title.
//!
//! The catalog is data. The built-in one is embedded from `data/roles.json` and can
//! be replaced wholesale from configuration without touching code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const GENERIC_OPENING_QUESTION: &str = "Tell me about yourself and your relevant experience.";
pub const GENERIC_FALLBACK_QUESTION: &str = "What motivates you in your professional career?";

/// Length of the lowercase prefix used to recognise an already-asked question.
pub const SIGNATURE_CHARS: usize = 50;

const BUILTIN_CATALOG: &str = include_str!("../data/roles.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricDimension {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub title: String,
    /// Non-opening categories the interview should cover.
    pub categories: Vec<String>,
    #[serde(default)]
    pub opening_questions: Vec<String>,
    #[serde(default)]
    pub question_bank: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub fallback_questions: Vec<String>,
    #[serde(default)]
    pub rubric: Vec<RubricDimension>,
}

impl RoleProfile {
    /// Profile used for titles the catalog does not know.
    pub fn generic(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            categories: vec!["experience".into(), "behavioral".into(), "situational".into()],
            opening_questions: vec![],
            question_bank: BTreeMap::new(),
            fallback_questions: vec![
                "Tell me about a challenge you faced at work and how you handled it.".into(),
                "Describe a time you worked with a team to reach a shared goal.".into(),
                "Tell me about a mistake you made and what you learned from it.".into(),
            ],
            rubric: vec![
                RubricDimension {
                    name: "communication".into(),
                    weight: 0.4,
                },
                RubricDimension {
                    name: "problem_solving".into(),
                    weight: 0.3,
                },
                RubricDimension {
                    name: "collaboration".into(),
                    weight: 0.3,
                },
            ],
        }
    }

    pub fn opening_question(&self) -> &str {
        self.opening_questions
            .first()
            .map(String::as_str)
            .unwrap_or(GENERIC_OPENING_QUESTION)
    }

    pub fn questions_for(&self, category: &str) -> &[String] {
        self.question_bank
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCatalog {
    pub roles: Vec<RoleProfile>,
}

impl RoleCatalog {
    pub fn builtin() -> &'static RoleCatalog {
        static CATALOG: OnceLock<RoleCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            RoleCatalog::from_json(BUILTIN_CATALOG).expect("embedded role catalog is valid JSON")
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn get(&self, title: &str) -> Option<&RoleProfile> {
        let wanted = title.trim();
        self.roles
            .iter()
            .find(|r| r.title.eq_ignore_ascii_case(wanted))
    }

    /// The catalog entry for `title`, or a generic profile carrying that title.
    pub fn profile_for(&self, title: &str) -> RoleProfile {
        self.get(title)
            .cloned()
            .unwrap_or_else(|| RoleProfile::generic(title.trim()))
    }

    pub fn titles(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.title.as_str()).collect()
    }
}

/// Dedup signature of a question: its lowercased first `SIGNATURE_CHARS` characters.
pub fn question_signature(question: &str) -> String {
    question
        .trim()
        .to_lowercase()
        .chars()
        .take(SIGNATURE_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_three_roles() {
        let catalog = RoleCatalog::builtin();
        assert_eq!(
            catalog.titles(),
            vec!["Software Engineer", "Sales Representative", "Retail Associate"]
        );
        for role in &catalog.roles {
            assert!(!role.opening_questions.is_empty());
            assert!(!role.fallback_questions.is_empty());
            for cat in &role.categories {
                assert!(!role.questions_for(cat).is_empty(), "{} / {cat}", role.title);
            }
            let total: f64 = role.rubric.iter().map(|d| d.weight).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn lookup_is_case_insensitive_with_generic_fallback() {
        let catalog = RoleCatalog::builtin();
        assert!(catalog.get("software engineer").is_some());
        let unknown = catalog.profile_for("Data Wrangler");
        assert_eq!(unknown.title, "Data Wrangler");
        assert_eq!(unknown.opening_question(), GENERIC_OPENING_QUESTION);
        assert!(!unknown.categories.is_empty());
    }

    #[test]
    fn signature_is_lowercase_prefix() {
        let q = "Tell Me About A Time You Had To Deliver Bad News To A Customer Quickly";
        let sig = question_signature(q);
        assert_eq!(sig.chars().count(), SIGNATURE_CHARS);
        assert_eq!(sig, sig.to_lowercase());
        assert_eq!(question_signature("  Short?  "), "short?");
    }

    #[test]
    fn custom_catalog_loads_from_json() {
        let raw = r#"{"roles":[{"title":"Barista","categories":["craft"]}]}"#;
        let catalog = RoleCatalog::from_json(raw).unwrap();
        let role = catalog.get("barista").unwrap();
        assert!(role.questions_for("craft").is_empty());
        assert_eq!(role.opening_question(), GENERIC_OPENING_QUESTION);
    }
}
