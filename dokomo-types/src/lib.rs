//! Core types for the dokomo crate.
//!
//! This crate provides the data model a submission is validated against:
//! - `Survey`, `SurveyNode` and `SubSurvey` - The survey's node tree
//! - `Node`, `Choice` and `AnswerType` - Question definitions
//! - `Bucket` - Range and choice predicates gating sub-surveys
//! - `SubmittedAnswer` and `ValidatedAnswer` - Answers before and after validation
//! - `SurveyDefinition` - The serializable form surveys are stored in

mod id;
pub use id::{ChoiceId, NodeId, SurveyNodeId};

mod answer_type;
pub use answer_type::{AnswerType, BucketType};

mod temporal;

mod node;
pub use node::{Choice, Node};

mod answer_value;
pub use answer_value::{AnswerError, AnswerValue, Facility, Location, SelectedChoice};

mod bucket;
pub use bucket::{Bucket, BucketError, ChoiceSelector, Interval};

mod survey;
pub use survey::{SubSurvey, Survey, SurveyNode};

mod answer;
pub use answer::{Response, ResponseType, SubmittedAnswer, ValidatedAnswer};

mod definition;
pub use definition::{
    BucketDefinition, ChoiceDefinition, NodeDefinition, SubSurveyDefinition, SurveyDefinition,
    SurveyNodeDefinition,
};

mod error;
pub use error::{Rejection, SurveyError};
