//! Build submissions in code, for tests and tools.
//!
//! # Example
//!
//! ```rust
//! use dokomo::{AnswerType, Node, SubmissionBuilder, Survey, SurveyNode};
//!
//! let survey = Survey::new(vec![
//!     SurveyNode::new("age", Node::new("age", AnswerType::Integer)).required(),
//!     SurveyNode::new("name", Node::new("name", AnswerType::Text)),
//! ])
//! .unwrap();
//!
//! let accepted = SubmissionBuilder::new()
//!     .with_int("age", 42)
//!     .with_text("name", "Ada")
//!     .validate(&survey)
//!     .unwrap();
//!
//! assert_eq!(accepted.len(), 2);
//! ```

use serde_json::{Value, json};

use crate::{AnswerType, Survey, SubmittedAnswer, SurveyNodeId, Verdict, validate};

/// Collects submitted answers in the order they are added.
#[derive(Debug, Clone, Default)]
pub struct SubmissionBuilder {
    answers: Vec<SubmittedAnswer>,
}

impl SubmissionBuilder {
    /// Create a new empty submission.
    pub fn new() -> Self {
        Self {
            answers: Vec::new(),
        }
    }

    /// Add a prepared answer.
    pub fn with_answer(mut self, answer: SubmittedAnswer) -> Self {
        self.answers.push(answer);
        self
    }

    /// Add an `answer` response with a raw payload.
    pub fn with_response(
        self,
        survey_node_id: impl Into<SurveyNodeId>,
        value: impl Into<Value>,
    ) -> Self {
        self.with_answer(SubmittedAnswer::answer(survey_node_id, value))
    }

    /// Add an `answer` response that also declares its answer type.
    pub fn with_typed_response(
        self,
        survey_node_id: impl Into<SurveyNodeId>,
        answer_type: AnswerType,
        value: impl Into<Value>,
    ) -> Self {
        self.with_answer(
            SubmittedAnswer::answer(survey_node_id, value).with_type_constraint(answer_type),
        )
    }

    /// Add an integer answer.
    pub fn with_int(self, survey_node_id: impl Into<SurveyNodeId>, value: i64) -> Self {
        self.with_response(survey_node_id, value)
    }

    /// Add a decimal answer.
    pub fn with_decimal(self, survey_node_id: impl Into<SurveyNodeId>, value: f64) -> Self {
        self.with_response(survey_node_id, value)
    }

    /// Add a text answer. Also used for dates, times and timestamps.
    pub fn with_text(self, survey_node_id: impl Into<SurveyNodeId>, value: impl Into<String>) -> Self {
        self.with_response(survey_node_id, value.into())
    }

    /// Add a location answer.
    pub fn with_location(self, survey_node_id: impl Into<SurveyNodeId>, lng: f64, lat: f64) -> Self {
        self.with_response(survey_node_id, json!({"lng": lng, "lat": lat}))
    }

    /// Add a multiple choice answer by choice id.
    pub fn with_choice(self, survey_node_id: impl Into<SurveyNodeId>, choice_id: impl Into<String>) -> Self {
        self.with_response(survey_node_id, choice_id.into())
    }

    /// Add an `other` response.
    pub fn with_other(self, survey_node_id: impl Into<SurveyNodeId>, text: impl Into<String>) -> Self {
        self.with_answer(SubmittedAnswer::other(survey_node_id, text))
    }

    /// Add a `dont_know` response.
    pub fn with_dont_know(self, survey_node_id: impl Into<SurveyNodeId>) -> Self {
        self.with_answer(SubmittedAnswer::dont_know(survey_node_id))
    }

    pub fn answers(&self) -> &[SubmittedAnswer] {
        &self.answers
    }

    pub fn build(self) -> Vec<SubmittedAnswer> {
        self.answers
    }

    /// Validate the collected answers against `survey` with default options.
    pub fn validate(&self, survey: &Survey) -> Verdict {
        validate(survey, &self.answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let answers = SubmissionBuilder::new()
            .with_int("b", 1)
            .with_text("a", "x")
            .with_dont_know("c")
            .build();

        let ids: Vec<_> = answers
            .iter()
            .map(|answer| answer.survey_node_id().as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn typed_response_declares_type() {
        let builder = SubmissionBuilder::new().with_typed_response("a", AnswerType::Decimal, 1.5);
        assert_eq!(
            builder.answers()[0].type_constraint(),
            Some(AnswerType::Decimal)
        );
    }
}
