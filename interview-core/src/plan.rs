use serde::{Deserialize, Serialize};

/// A topic that resume analysis flagged for probing during the interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusArea {
    pub topic: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub suggested_question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePlan {
    #[serde(default = "default_candidate_name")]
    pub candidate_name: String,
    #[serde(default)]
    pub focus_areas: Vec<FocusArea>,
}

fn default_candidate_name() -> String {
    "Candidate".into()
}

impl ResumePlan {
    /// Plan used when a resume was supplied but could not be analyzed.
    pub fn fallback() -> Self {
        Self {
            candidate_name: default_candidate_name(),
            focus_areas: vec![FocusArea {
                topic: "General Experience".into(),
                reason: "Resume analysis failed".into(),
                suggested_question: Some("Tell me about your background.".into()),
            }],
        }
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.focus_areas.iter().map(|f| f.topic.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_partial_plan() {
        let plan: ResumePlan =
            serde_json::from_str(r#"{"focus_areas":[{"topic":"Kubernetes"}]}"#).unwrap();
        assert_eq!(plan.candidate_name, "Candidate");
        assert_eq!(plan.topics().collect::<Vec<_>>(), vec!["Kubernetes"]);
        assert_eq!(plan.focus_areas[0].suggested_question, None);
    }
}
