use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AnswerType, ChoiceId, Node, temporal};

/// Why a raw answer payload could not be read as the question's type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnswerError {
    #[error("expected {expected}, got {found}")]
    WrongShape { expected: &'static str, found: String },

    #[error("coordinates (lng {lng}, lat {lat}) are out of range")]
    CoordinatesOutOfRange { lng: f64, lat: f64 },

    #[error("choice {0} is not offered by this question")]
    UnknownChoice(String),

    #[error("note questions take no answer")]
    NoteTakesNoAnswer,
}

/// A typed answer value, read from a submitted payload.
///
/// Serializes to the shape the submission is stored in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),

    Decimal(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal),

    Text(String),

    Date(NaiveDate),

    Time(NaiveTime),

    Timestamp(DateTime<FixedOffset>),

    Location(Location),

    Facility(Facility),

    /// The id of a photo uploaded separately.
    Photo(String),

    /// A multiple-choice selection, resolved against the question's choices.
    Choice(SelectedChoice),
}

/// A point given as longitude / latitude degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lng: f64,
    pub lat: f64,
}

impl Location {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    fn from_value(raw: &Value) -> Option<Self> {
        Some(Self::new(raw.get("lng")?.as_f64()?, raw.get("lat")?.as_f64()?))
    }

    fn check_range(self) -> Result<Self, AnswerError> {
        let in_range = (-180.0..=180.0).contains(&self.lng) && (-90.0..=90.0).contains(&self.lat);
        if in_range {
            Ok(self)
        } else {
            Err(AnswerError::CoordinatesOutOfRange {
                lng: self.lng,
                lat: self.lat,
            })
        }
    }
}

/// A facility picked from (or added to) a facility registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub facility_id: String,
    pub facility_name: String,
    pub facility_sector: String,
    pub lng: f64,
    pub lat: f64,
}

impl Facility {
    fn from_value(raw: &Value) -> Option<Self> {
        let text = |key: &str| raw.get(key)?.as_str().map(str::to_owned);
        let location = Location::from_value(raw)?;
        Some(Self {
            facility_id: text("facility_id")?,
            facility_name: text("facility_name")?,
            facility_sector: text("facility_sector")?,
            lng: location.lng,
            lat: location.lat,
        })
    }
}

/// The choice a multiple-choice answer selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedChoice {
    pub choice_id: ChoiceId,
    pub choice_number: usize,
}

impl AnswerValue {
    /// Read a raw payload as an answer to `node`.
    ///
    /// Multiple-choice payloads carry a choice id, which must name one of the
    /// node's choices.
    pub fn parse(node: &Node, raw: &Value) -> Result<Self, AnswerError> {
        let wrong = |expected: &'static str| AnswerError::WrongShape {
            expected,
            found: raw.to_string(),
        };

        match node.answer_type() {
            AnswerType::Integer => raw
                .as_i64()
                .map(Self::Integer)
                .ok_or_else(|| wrong("an integer")),
            AnswerType::Decimal => match raw {
                Value::Number(number) => parse_decimal(&number.to_string()),
                Value::String(text) => parse_decimal(text),
                _ => None,
            }
            .map(Self::Decimal)
            .ok_or_else(|| wrong("a decimal number")),
            AnswerType::Text => raw
                .as_str()
                .map(|text| Self::Text(text.to_owned()))
                .ok_or_else(|| wrong("text")),
            AnswerType::Date => raw
                .as_str()
                .and_then(temporal::parse_date)
                .map(Self::Date)
                .ok_or_else(|| wrong("a date (YYYY-MM-DD)")),
            AnswerType::Time => raw
                .as_str()
                .and_then(temporal::parse_time)
                .map(Self::Time)
                .ok_or_else(|| wrong("a time (HH:MM[:SS])")),
            AnswerType::Timestamp => raw
                .as_str()
                .and_then(temporal::parse_timestamp)
                .map(Self::Timestamp)
                .ok_or_else(|| wrong("a timestamp")),
            AnswerType::Location => {
                let location =
                    Location::from_value(raw).ok_or_else(|| wrong("a location {lng, lat}"))?;
                Ok(Self::Location(location.check_range()?))
            }
            AnswerType::Facility => {
                let facility = Facility::from_value(raw).ok_or_else(|| wrong("a facility"))?;
                Location::new(facility.lng, facility.lat).check_range()?;
                Ok(Self::Facility(facility))
            }
            AnswerType::Photo => raw
                .as_str()
                .filter(|id| !id.trim().is_empty())
                .map(|id| Self::Photo(id.to_owned()))
                .ok_or_else(|| wrong("a photo id")),
            AnswerType::Note => Err(AnswerError::NoteTakesNoAnswer),
            AnswerType::MultipleChoice => {
                let id = raw.as_str().ok_or_else(|| wrong("a choice id"))?;
                let choice = node
                    .choice_by_id(&ChoiceId::new(id))
                    .ok_or_else(|| AnswerError::UnknownChoice(id.to_owned()))?;
                Ok(Self::Choice(SelectedChoice {
                    choice_id: choice.id.clone(),
                    choice_number: choice.number,
                }))
            }
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a decimal.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get this value as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a selected choice.
    pub fn as_choice(&self) -> Option<&SelectedChoice> {
        match self {
            Self::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    /// Get the type name of this value for error and log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Decimal(_) => "Decimal",
            Self::Text(_) => "Text",
            Self::Date(_) => "Date",
            Self::Time(_) => "Time",
            Self::Timestamp(_) => "Timestamp",
            Self::Location(_) => "Location",
            Self::Facility(_) => "Facility",
            Self::Photo(_) => "Photo",
            Self::Choice(_) => "Choice",
        }
    }
}

impl From<i64> for AnswerValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<Decimal> for AnswerValue {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<NaiveDate> for AnswerValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// Read decimal text exactly, plain (`0.25`) or scientific (`2.5e-1`).
///
/// Values that cannot be held without rounding are refused.
pub(crate) fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
