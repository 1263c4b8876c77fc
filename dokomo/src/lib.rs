//! # dokomo
//!
//! Validate survey submissions against nested, bucket-gated survey trees.
//!
//! A [`Survey`] is a tree of survey nodes. A node may own sub-surveys, each
//! guarded by buckets: ranges over the node's answer, or choices of a
//! multiple-choice question. A sub-survey is only asked when the node's
//! answer falls in one of its buckets, and a repeatable sub-survey is asked
//! once per round.
//!
//! Validating a submission walks that tree. It either accepts every answer,
//! normalized and in submitted order, or returns the first [`Rejection`]:
//! a required question left unanswered, an answer for an unknown or
//! unreachable node, or an answer that does not fit its question.
//!
//! ## Usage
//!
//! ```rust
//! use dokomo::{AnswerType, Bucket, BucketType, Node, SubSurvey, SubmittedAnswer, Survey, SurveyNode};
//!
//! let survey = Survey::new(vec![
//!     SurveyNode::new("age", Node::new("age", AnswerType::Integer))
//!         .required()
//!         .with_sub_survey(SubSurvey::new(
//!             vec![Bucket::parse_range(BucketType::Integer, "[18,]").unwrap()],
//!             vec![SurveyNode::new("employer", Node::new("employer", AnswerType::Text)).required()],
//!         )),
//! ])
//! .unwrap();
//!
//! let adult = [
//!     SubmittedAnswer::answer("age", 30),
//!     SubmittedAnswer::answer("employer", "Library"),
//! ];
//! assert!(dokomo::validate(&survey, &adult).is_ok());
//!
//! let skipped = [SubmittedAnswer::answer("age", 30)];
//! assert!(dokomo::validate(&survey, &skipped).unwrap_err().is_skipped());
//! ```
//!
//! ## Options
//!
//! [`Validator::with_options`] takes [`ValidationOptions`], which decide
//! whether unreachable answers are refused or dropped and whether an integer
//! answer fixes the number of rounds of a repeatable sub-survey.

// Re-export all types from dokomo-types
pub use dokomo_types::*;

mod answer_index;
pub use answer_index::AnswerIndex;

mod options;
pub use options::{UnreachableAnswers, ValidationOptions};

mod validator;
pub use validator::{Validator, Verdict, validate};

// Submissions built in code, for tests and tools
mod submission_builder;
pub use submission_builder::SubmissionBuilder;
