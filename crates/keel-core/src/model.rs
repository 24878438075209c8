//! Persisted domain records.

use crate::error::WorkflowError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-authored value statement used as a lens for decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Principle {
    /// Opaque identifier, unique within the set.
    pub id: String,
    /// Short display title.
    pub title: String,
    /// Longer statement of what the value means in practice.
    pub description: String,
}

impl Principle {
    /// Create a principle with a fresh identifier.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A principle-linked question plus the user's free-text answer.
///
/// Title and description are copies captured at analysis time, so editing a
/// principle later does not rewrite past records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reflection {
    /// Id of the principle the question was derived from.
    pub principle_id: String,
    /// Principle title at analysis time.
    pub principle_title: String,
    /// Principle description at analysis time.
    pub principle_description: String,
    /// Question generated for this principle.
    pub question: String,
    /// The user's answer, absent until filled in.
    #[serde(default)]
    pub answer: Option<String>,
}

impl Reflection {
    /// Build a reflection for a principle, denormalizing its fields.
    pub fn from_principle(principle: &Principle, question: impl Into<String>) -> Self {
        Self {
            principle_id: principle.id.clone(),
            principle_title: principle.title.clone(),
            principle_description: principle.description.clone(),
            question: question.into(),
            answer: None,
        }
    }

    /// Whether the answer is present and non-blank.
    pub fn is_answered(&self) -> bool {
        self.answer
            .as_deref()
            .is_some_and(|answer| !answer.trim().is_empty())
    }
}

/// An immutable archived outcome of one full workflow pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
    /// The dilemma as the user described it.
    pub situation: String,
    /// All reflections, each with a non-empty answer.
    pub reflections: Vec<Reflection>,
    /// Synthesized advice text.
    pub final_advice: String,
}

impl DecisionRecord {
    /// Construct a record from a completed workflow pass.
    ///
    /// Every reflection must carry a non-empty answer; a record is never
    /// created from a partially answered draft.
    pub fn new(
        situation: impl Into<String>,
        reflections: Vec<Reflection>,
        final_advice: impl Into<String>,
    ) -> Result<Self, WorkflowError> {
        if reflections.iter().any(|reflection| !reflection.is_answered()) {
            return Err(WorkflowError::UnansweredReflection);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            situation: situation.into(),
            reflections,
            final_advice: final_advice.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DecisionRecord, Principle, Reflection};
    use crate::error::WorkflowError;
    use pretty_assertions::assert_eq;

    fn answered(principle: &Principle, answer: &str) -> Reflection {
        let mut reflection = Reflection::from_principle(principle, "why?");
        reflection.answer = Some(answer.to_string());
        reflection
    }

    #[test]
    fn reflection_denormalizes_principle_fields() {
        let principle = Principle::new("Courage", "Act despite fear");
        let reflection = Reflection::from_principle(&principle, "What scares you here?");
        assert_eq!(reflection.principle_id, principle.id);
        assert_eq!(reflection.principle_title, "Courage");
        assert_eq!(reflection.principle_description, "Act despite fear");
        assert_eq!(reflection.answer, None);
        assert!(!reflection.is_answered());
    }

    #[test]
    fn blank_answer_does_not_count_as_answered() {
        let principle = Principle::new("Courage", "Act despite fear");
        let mut reflection = Reflection::from_principle(&principle, "why?");
        reflection.answer = Some("   ".to_string());
        assert!(!reflection.is_answered());
    }

    #[test]
    fn record_requires_every_answer() {
        let principle = Principle::new("Courage", "Act despite fear");
        let unanswered = Reflection::from_principle(&principle, "why?");
        let result = DecisionRecord::new("quit my job?", vec![unanswered], "advice");
        assert_eq!(result.unwrap_err(), WorkflowError::UnansweredReflection);

        let record =
            DecisionRecord::new("quit my job?", vec![answered(&principle, "yes")], "advice")
                .expect("record");
        assert_eq!(record.final_advice, "advice");
        assert_eq!(record.reflections.len(), 1);
    }
}
