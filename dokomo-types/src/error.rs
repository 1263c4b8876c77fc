use crate::{AnswerError, AnswerType, BucketError, ChoiceId, ResponseType, SurveyNodeId};

/// Error type for survey construction.
///
/// These are authoring faults: they surface when a survey is created, never
/// while a submission is validated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurveyError {
    /// A sub-survey of this node has a bucket that is unparseable, empty, or
    /// does not fit the node's answer type.
    #[error("SurveyNode {survey_node_id} has a malformed bucket: {source}")]
    MalformedBucket {
        survey_node_id: SurveyNodeId,
        source: BucketError,
    },

    #[error("SurveyNode {0} appears more than once")]
    DuplicateSurveyNode(SurveyNodeId),

    #[error("SurveyNode {0} is repeatable but not inside a repeatable sub-survey")]
    RepeatableOutsideRepeatableSubSurvey(SurveyNodeId),

    #[error("SurveyNode {survey_node_id} offers choice {choice} twice")]
    DuplicateChoice {
        survey_node_id: SurveyNodeId,
        choice: ChoiceId,
    },
}

/// Why a submission was refused.
///
/// Validation stops at the first violation, so a rejection always names a
/// single node or answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// Traversal reached a required node that has no answer.
    #[error("SurveyNode {survey_node_id} was skipped{}", round_suffix(.round))]
    SkippedRequiredQuestion {
        survey_node_id: SurveyNodeId,
        /// Zero-based round, when the node sits in a repeatable sub-survey.
        round: Option<usize>,
    },

    /// An answer references an id that is not in the survey.
    #[error("SurveyNode {survey_node_id} not found (answer #{position})")]
    SurveyNodeNotFound {
        survey_node_id: SurveyNodeId,
        position: usize,
    },

    /// An answer was never reached: its branch was not selected, or it
    /// exceeds the answers its node takes.
    #[error("answer #{position} for SurveyNode {survey_node_id} is not reachable")]
    OrphanedAnswer {
        survey_node_id: SurveyNodeId,
        position: usize,
    },

    /// The answer's declared type differs from the node's type.
    #[error("answer for SurveyNode {survey_node_id} claims type {claimed}, expected {expected}")]
    TypeConstraintMismatch {
        survey_node_id: SurveyNodeId,
        claimed: AnswerType,
        expected: AnswerType,
    },

    /// The node does not accept `other` or `dont_know` responses.
    #[error("SurveyNode {survey_node_id} does not allow {response_type} responses")]
    ResponseTypeNotAllowed {
        survey_node_id: SurveyNodeId,
        response_type: ResponseType,
    },

    /// The payload could not be read as the node's answer type.
    #[error("invalid answer for SurveyNode {survey_node_id}: {source}")]
    InvalidAnswer {
        survey_node_id: SurveyNodeId,
        source: AnswerError,
    },
}

impl Rejection {
    /// The survey node this rejection is about.
    pub fn survey_node_id(&self) -> &SurveyNodeId {
        match self {
            Self::SkippedRequiredQuestion { survey_node_id, .. }
            | Self::SurveyNodeNotFound { survey_node_id, .. }
            | Self::OrphanedAnswer { survey_node_id, .. }
            | Self::TypeConstraintMismatch { survey_node_id, .. }
            | Self::ResponseTypeNotAllowed { survey_node_id, .. }
            | Self::InvalidAnswer { survey_node_id, .. } => survey_node_id,
        }
    }

    /// Check if this rejection reports a skipped required question.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::SkippedRequiredQuestion { .. })
    }
}

fn round_suffix(round: &Option<usize>) -> String {
    round
        .map(|round| format!(" in round {}", round + 1))
        .unwrap_or_default()
}
