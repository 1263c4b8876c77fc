use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{AnswerType, AnswerValue, SurveyNodeId};

/// How a submitter responded to a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// A value of the question's answer type.
    #[default]
    Answer,

    /// Free text outside the offered choices.
    Other,

    /// The submitter explicitly did not know.
    DontKnow,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answer => "answer",
            Self::Other => "other",
            Self::DontKnow => "dont_know",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a submission's flat answer list, before validation.
///
/// Deserializes from both spellings submitters use:
/// `{"survey_node_id": .., "answer": 3}` and
/// `{"survey_node_id": .., "response": {"response_type": "answer", "response": 3}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedAnswer {
    survey_node_id: SurveyNodeId,

    /// The submitter's claim about the answer type, checked against the node.
    type_constraint: Option<AnswerType>,

    response_type: ResponseType,

    /// The raw payload, read according to the node's answer type.
    response: Value,
}

impl SubmittedAnswer {
    /// An `answer` response carrying `value`.
    pub fn answer(survey_node_id: impl Into<SurveyNodeId>, value: impl Into<Value>) -> Self {
        Self {
            survey_node_id: survey_node_id.into(),
            type_constraint: None,
            response_type: ResponseType::Answer,
            response: value.into(),
        }
    }

    /// An `other` response carrying free text.
    pub fn other(survey_node_id: impl Into<SurveyNodeId>, text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Other,
            ..Self::answer(survey_node_id, Value::String(text.into()))
        }
    }

    /// A `dont_know` response.
    pub fn dont_know(survey_node_id: impl Into<SurveyNodeId>) -> Self {
        Self {
            response_type: ResponseType::DontKnow,
            ..Self::answer(survey_node_id, Value::Null)
        }
    }

    /// Declare the answer type the submitter believes the node has.
    pub fn with_type_constraint(mut self, answer_type: AnswerType) -> Self {
        self.type_constraint = Some(answer_type);
        self
    }

    pub fn survey_node_id(&self) -> &SurveyNodeId {
        &self.survey_node_id
    }

    pub fn type_constraint(&self) -> Option<AnswerType> {
        self.type_constraint
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub fn response(&self) -> &Value {
        &self.response
    }
}

#[derive(Serialize, Deserialize)]
struct RawSubmittedAnswer {
    survey_node_id: SurveyNodeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_constraint: Option<AnswerType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    answer: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    response: Option<RawResponse>,
}

#[derive(Serialize, Deserialize)]
struct RawResponse {
    #[serde(default)]
    response_type: ResponseType,

    #[serde(default)]
    response: Value,
}

impl<'de> Deserialize<'de> for SubmittedAnswer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSubmittedAnswer::deserialize(deserializer)?;
        let (response_type, response) = match (raw.answer, raw.response) {
            (Some(answer), None) => (ResponseType::Answer, answer),
            (None, Some(response)) => (response.response_type, response.response),
            _ => {
                return Err(serde::de::Error::custom(format!(
                    "answer for SurveyNode {} must carry exactly one of `answer` or `response`",
                    raw.survey_node_id
                )));
            }
        };
        Ok(Self {
            survey_node_id: raw.survey_node_id,
            type_constraint: raw.type_constraint,
            response_type,
            response,
        })
    }
}

impl Serialize for SubmittedAnswer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawSubmittedAnswer {
            survey_node_id: self.survey_node_id.clone(),
            type_constraint: self.type_constraint,
            answer: None,
            response: Some(RawResponse {
                response_type: self.response_type,
                response: self.response.clone(),
            }),
        }
        .serialize(serializer)
    }
}

/// A response that passed validation, in the form it is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "response_type", content = "response", rename_all = "snake_case")]
pub enum Response {
    Answer(AnswerValue),
    Other(String),
    DontKnow(String),
}

impl Response {
    pub fn response_type(&self) -> ResponseType {
        match self {
            Self::Answer(_) => ResponseType::Answer,
            Self::Other(_) => ResponseType::Other,
            Self::DontKnow(_) => ResponseType::DontKnow,
        }
    }

    /// The typed value, for `answer` responses.
    pub fn value(&self) -> Option<&AnswerValue> {
        match self {
            Self::Answer(value) => Some(value),
            Self::Other(_) | Self::DontKnow(_) => None,
        }
    }
}

/// One answer of an accepted submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedAnswer {
    pub survey_node_id: SurveyNodeId,

    #[serde(rename = "type_constraint")]
    pub answer_type: AnswerType,

    pub response: Response,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn short_form() {
        let answer: SubmittedAnswer = serde_json::from_value(json!({
            "survey_node_id": "60e56824",
            "type_constraint": "integer",
            "answer": 3,
        }))
        .unwrap();

        assert_eq!(answer, SubmittedAnswer::answer("60e56824", 3).with_type_constraint(AnswerType::Integer));
    }

    #[test]
    fn long_form() {
        let answer: SubmittedAnswer = serde_json::from_value(json!({
            "survey_node_id": "80e56824",
            "type_constraint": "multiple_choice",
            "response": {"response_type": "other", "response": "bwop"},
        }))
        .unwrap();

        assert_eq!(answer.response_type(), ResponseType::Other);
        assert_eq!(answer.response(), &json!("bwop"));
    }

    #[test]
    fn requires_exactly_one_payload() {
        let neither = serde_json::from_value::<SubmittedAnswer>(json!({"survey_node_id": "a"}));
        assert!(neither.is_err());

        let both = serde_json::from_value::<SubmittedAnswer>(json!({
            "survey_node_id": "a",
            "answer": 1,
            "response": {"response": 1},
        }));
        assert!(both.is_err());
    }

    #[test]
    fn serializes_long_form() {
        let json = serde_json::to_value(SubmittedAnswer::dont_know("a")).unwrap();
        assert_eq!(
            json,
            json!({
                "survey_node_id": "a",
                "response": {"response_type": "dont_know", "response": null},
            })
        );
    }

    #[test]
    fn validated_answer_shape() {
        let answer = ValidatedAnswer {
            survey_node_id: SurveyNodeId::new("a"),
            answer_type: AnswerType::Integer,
            response: Response::Answer(AnswerValue::Integer(3)),
        };
        assert_eq!(
            serde_json::to_value(&answer).unwrap(),
            json!({
                "survey_node_id": "a",
                "type_constraint": "integer",
                "response": {"response_type": "answer", "response": 3},
            })
        );
    }
}
