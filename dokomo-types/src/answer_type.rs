use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of answer types a question can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Integer,
    Decimal,
    Text,
    Date,
    Time,
    Timestamp,
    Location,
    Facility,
    Photo,
    /// Informational text. Never answered and never required.
    Note,
    MultipleChoice,
}

impl AnswerType {
    /// The wire name of this type, as used in `type_constraint`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::Location => "location",
            Self::Facility => "facility",
            Self::Photo => "photo",
            Self::Note => "note",
            Self::MultipleChoice => "multiple_choice",
        }
    }

    /// Check if this is the informational `note` type.
    pub fn is_note(&self) -> bool {
        matches!(self, Self::Note)
    }

    /// The bucket type that may gate sub-surveys under a question of this type.
    ///
    /// Returns `None` for types that cannot carry sub-surveys.
    pub fn bucket_type(&self) -> Option<BucketType> {
        match self {
            Self::Integer => Some(BucketType::Integer),
            Self::Decimal => Some(BucketType::Decimal),
            Self::Date => Some(BucketType::Date),
            Self::Time => Some(BucketType::Time),
            Self::Timestamp => Some(BucketType::Timestamp),
            Self::MultipleChoice => Some(BucketType::MultipleChoice),
            Self::Text | Self::Location | Self::Facility | Self::Photo | Self::Note => None,
        }
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of predicate a bucket holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketType {
    Integer,
    Decimal,
    Date,
    Time,
    Timestamp,
    MultipleChoice,
}

impl BucketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::MultipleChoice => "multiple_choice",
        }
    }
}

impl fmt::Display for BucketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
