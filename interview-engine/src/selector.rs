//! Question/Topic Selector.

use crate::session::Session;
use interview_core::plan::FocusArea;
use interview_core::prompts::QuestionTarget;
use interview_core::roles::GENERIC_FALLBACK_QUESTION;

const GENERAL_TOPIC: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicChoice {
    /// A resume-derived focus area not probed yet.
    Focus(FocusArea),
    Category(String),
}

impl TopicChoice {
    pub fn label(&self) -> &str {
        match self {
            TopicChoice::Focus(f) => &f.topic,
            TopicChoice::Category(c) => c,
        }
    }

    pub fn as_target(&self) -> QuestionTarget<'_> {
        match self {
            TopicChoice::Focus(f) => QuestionTarget::Focus(f),
            TopicChoice::Category(c) => QuestionTarget::Category(c),
        }
    }
}

/// Picks the next topic and records it as covered.
///
/// Order: uncovered focus area, then the next unused role category, then a
/// round robin over all categories keyed by `question_count`.
pub fn select_next_topic(session: &mut Session) -> TopicChoice {
    let focus = session.plan.as_ref().and_then(|plan| {
        plan.focus_areas
            .iter()
            .find(|f| !session.focus_areas_covered.contains(&f.topic))
            .cloned()
    });
    if let Some(focus) = focus {
        session.focus_areas_covered.insert(focus.topic.clone());
        return TopicChoice::Focus(focus);
    }

    let categories = &session.role().categories;
    let unused = categories
        .iter()
        .find(|c| !session.topics_covered.contains(*c))
        .cloned();
    let category = match unused {
        Some(c) => c,
        None if categories.is_empty() => GENERAL_TOPIC.to_string(),
        None => categories[session.question_count as usize % categories.len()].clone(),
    };
    session.topics_covered.insert(category.clone());
    TopicChoice::Category(category)
}

/// A canned question for `topic` that this session has not asked yet.
///
/// Tries the topic's own bank (or the focus area's suggestion), then the role's
/// fallback list, then the generic catch-all. The chosen question is recorded.
pub fn fallback_question(session: &mut Session, topic: &TopicChoice) -> String {
    let role = session.role();
    let topical: Vec<&str> = match topic {
        TopicChoice::Focus(f) => f.suggested_question.as_deref().into_iter().collect(),
        TopicChoice::Category(c) => role.questions_for(c).iter().map(String::as_str).collect(),
    };

    let chosen = topical
        .into_iter()
        .chain(role.fallback_questions.iter().map(String::as_str))
        .find(|q| !q.trim().is_empty() && !session.has_asked(q))
        .unwrap_or(GENERIC_FALLBACK_QUESTION)
        .to_string();

    session.record_question(&chosen);
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::plan::ResumePlan;
    use interview_core::roles::{RoleCatalog, RoleProfile};
    use interview_core::types::ExperienceLevel;

    fn engineer() -> Session {
        Session::new(
            RoleCatalog::builtin().profile_for("Software Engineer"),
            ExperienceLevel::Entry,
        )
    }

    #[test]
    fn focus_areas_come_first_then_categories() {
        let mut s = engineer();
        s.plan = Some(ResumePlan::fallback());

        let first = select_next_topic(&mut s);
        assert_eq!(first.label(), "General Experience");
        assert!(s.focus_areas_covered().contains("General Experience"));

        let second = select_next_topic(&mut s);
        assert_eq!(second, TopicChoice::Category(s.role().categories[0].clone()));
    }

    #[test]
    fn categories_then_round_robin() {
        let mut s = engineer();
        let cats = s.role().categories.clone();
        for c in &cats {
            assert_eq!(select_next_topic(&mut s).label(), c);
        }
        assert!(s.all_categories_covered());

        s.question_count = 4;
        assert_eq!(select_next_topic(&mut s).label(), cats[4 % cats.len()]);
    }

    #[test]
    fn role_without_categories_uses_general() {
        let mut role = RoleProfile::generic("Any");
        role.categories.clear();
        let mut s = Session::new(role, ExperienceLevel::Mid);
        assert_eq!(select_next_topic(&mut s).label(), GENERAL_TOPIC);
    }

    #[test]
    fn fallback_questions_never_repeat_until_exhausted() {
        let mut s = engineer();
        let topic = TopicChoice::Category("technical".into());
        let bank = s.role().questions_for("technical").len();
        let fallbacks = s.role().fallback_questions.len();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..(bank + fallbacks) {
            let q = fallback_question(&mut s, &topic);
            assert!(seen.insert(q));
        }
        assert_eq!(fallback_question(&mut s, &topic), GENERIC_FALLBACK_QUESTION);
    }

    #[test]
    fn focus_fallback_prefers_suggested_question() {
        let mut s = engineer();
        let plan = ResumePlan::fallback();
        let topic = TopicChoice::Focus(plan.focus_areas[0].clone());
        assert_eq!(fallback_question(&mut s, &topic), "Tell me about your background.");
        assert_ne!(fallback_question(&mut s, &topic), "Tell me about your background.");
    }
}
