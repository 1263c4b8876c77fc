use serde::{Deserialize, Serialize};

/// What to do with answers the traversal never reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreachableAnswers {
    /// Refuse the submission with `OrphanedAnswer`.
    #[default]
    Reject,

    /// Leave them out of the accepted answers.
    Drop,
}

/// Knobs for [`Validator`](crate::Validator).
///
/// Deserializable so deployments can keep them in a config file; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Answers for unknown survey nodes are refused whatever this says.
    pub unreachable_answers: UnreachableAnswers,

    /// An integer answer gating a repeatable sub-survey fixes how many
    /// rounds must be answered. When off, or for other answer types, rounds
    /// continue while answers remain.
    pub rounds_from_integer_answer: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            unreachable_answers: UnreachableAnswers::Reject,
            rounds_from_integer_answer: true,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unreachable_answers(mut self, policy: UnreachableAnswers) -> Self {
        self.unreachable_answers = policy;
        self
    }

    pub fn with_rounds_from_integer_answer(mut self, enabled: bool) -> Self {
        self.rounds_from_integer_answer = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let options: ValidationOptions =
            serde_json::from_str(r#"{"unreachable_answers": "drop"}"#).unwrap();
        assert_eq!(options.unreachable_answers, UnreachableAnswers::Drop);
        assert!(options.rounds_from_integer_answer);

        let empty: ValidationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ValidationOptions::default());
    }
}
