use std::fmt;
use std::ops::{Bound, RangeBounds};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::answer_value::parse_decimal;
use crate::{AnswerValue, BucketType, ChoiceId, Choice, Node, temporal};

/// Why a bucket definition was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BucketError {
    #[error("cannot parse {bucket_type} bucket {text}: {reason}")]
    Unparseable {
        bucket_type: BucketType,
        text: String,
        reason: String,
    },

    #[error("{bucket_type} bucket {text} can never match")]
    EmptyInterval { bucket_type: BucketType, text: String },

    #[error("{bucket_type} bucket cannot gate a {answer_type} question")]
    IncompatibleType {
        bucket_type: BucketType,
        answer_type: crate::AnswerType,
    },

    #[error("bucket selects {0}, which the question does not offer")]
    UnknownChoice(ChoiceSelector),

    #[error("sub-survey has no buckets")]
    NoBuckets,
}

/// A range over an ordered answer type. Each side is inclusive, exclusive
/// or unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<T> {
    lower: Bound<T>,
    upper: Bound<T>,
}

impl<T: PartialOrd> Interval<T> {
    /// Create an interval, returning `None` if no value can lie inside it.
    pub fn new(lower: Bound<T>, upper: Bound<T>) -> Option<Self> {
        let empty = match (&lower, &upper) {
            (Bound::Included(low), Bound::Included(high)) => low > high,
            (Bound::Included(low), Bound::Excluded(high))
            | (Bound::Excluded(low), Bound::Included(high))
            | (Bound::Excluded(low), Bound::Excluded(high)) => low >= high,
            _ => false,
        };
        (!empty).then_some(Self { lower, upper })
    }

    /// `[low, high]`
    pub fn closed(low: T, high: T) -> Option<Self> {
        Self::new(Bound::Included(low), Bound::Included(high))
    }

    /// `[,]`, matching every value.
    pub fn unbounded() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    pub fn lower(&self) -> Bound<&T> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Bound<&T> {
        self.upper.as_ref()
    }

    pub fn contains(&self, value: &T) -> bool {
        (self.lower(), self.upper()).contains(value)
    }

    /// Check whether some value lies in both intervals.
    pub fn overlaps(&self, other: &Self) -> bool {
        !ends_before(other.upper(), self.lower()) && !ends_before(self.upper(), other.lower())
    }
}

/// Check whether a range ending at `upper` lies wholly before one starting at `lower`.
fn ends_before<T: PartialOrd>(upper: Bound<&T>, lower: Bound<&T>) -> bool {
    match (upper, lower) {
        (Bound::Unbounded, _) | (_, Bound::Unbounded) => false,
        (Bound::Included(high), Bound::Included(low)) => high < low,
        (Bound::Included(high), Bound::Excluded(low))
        | (Bound::Excluded(high), Bound::Included(low))
        | (Bound::Excluded(high), Bound::Excluded(low)) => high <= low,
    }
}

/// Which choice a multiple-choice bucket selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChoiceSelector {
    Id(ChoiceId),
    Number(usize),
}

impl ChoiceSelector {
    /// Find the selected choice among the node's choices.
    pub fn resolve<'n>(&self, node: &'n Node) -> Option<&'n Choice> {
        match self {
            Self::Id(id) => node.choice_by_id(id),
            Self::Number(number) => node.choice_by_number(*number),
        }
    }
}

impl fmt::Display for ChoiceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "choice_id {id}"),
            Self::Number(number) => write!(f, "choice_number {number}"),
        }
    }
}

/// A predicate over an answer value, gating entry into a sub-survey.
#[derive(Debug, Clone, PartialEq)]
pub enum Bucket {
    Integer(Interval<i64>),
    Decimal(Interval<Decimal>),
    Date(Interval<NaiveDate>),
    Time(Interval<NaiveTime>),
    Timestamp(Interval<DateTime<FixedOffset>>),
    MultipleChoice(ChoiceSelector),
}

impl Bucket {
    /// Parse a bucket as stored in a survey definition.
    ///
    /// Range types take range text such as `"[1, 3]"` or `"(,5.2]"`.
    /// Multiple-choice buckets take `{"choice_number": 0}` or
    /// `{"choice_id": "..."}`.
    pub fn parse(bucket_type: BucketType, raw: &Value) -> Result<Self, BucketError> {
        if bucket_type == BucketType::MultipleChoice {
            return parse_choice_selector(raw).map(Self::MultipleChoice);
        }
        let text = raw.as_str().ok_or_else(|| BucketError::Unparseable {
            bucket_type,
            text: raw.to_string(),
            reason: "expected range text".to_string(),
        })?;
        Self::parse_range(bucket_type, text)
    }

    /// Parse range text such as `"[0, 5]"`, `"[2015-01-01, 2015-02-01)"` or `"[,]"`.
    pub fn parse_range(bucket_type: BucketType, text: &str) -> Result<Self, BucketError> {
        match bucket_type {
            BucketType::Integer => parse_interval(bucket_type, text, |bound| {
                bound.parse::<i64>().map_err(|err| err.to_string())
            })
            .map(Self::Integer),
            BucketType::Decimal => parse_interval(bucket_type, text, |bound| {
                parse_decimal(bound).ok_or_else(|| format!("{bound} is not an exact decimal"))
            })
            .map(Self::Decimal),
            BucketType::Date => parse_interval(bucket_type, text, |bound| {
                temporal::parse_date(bound).ok_or_else(|| format!("{bound} is not a date"))
            })
            .map(Self::Date),
            BucketType::Time => parse_interval(bucket_type, text, |bound| {
                temporal::parse_time(bound).ok_or_else(|| format!("{bound} is not a time"))
            })
            .map(Self::Time),
            BucketType::Timestamp => parse_interval(bucket_type, text, |bound| {
                temporal::parse_timestamp(bound)
                    .ok_or_else(|| format!("{bound} is not a timestamp"))
            })
            .map(Self::Timestamp),
            BucketType::MultipleChoice => Err(BucketError::Unparseable {
                bucket_type,
                text: text.to_string(),
                reason: "multiple-choice buckets select a choice, not a range".to_string(),
            }),
        }
    }

    /// A multiple-choice bucket selecting the choice with this number.
    pub fn choice_number(number: usize) -> Self {
        Self::MultipleChoice(ChoiceSelector::Number(number))
    }

    /// A multiple-choice bucket selecting the choice with this id.
    pub fn choice_id(id: impl Into<ChoiceId>) -> Self {
        Self::MultipleChoice(ChoiceSelector::Id(id.into()))
    }

    pub fn bucket_type(&self) -> BucketType {
        match self {
            Self::Integer(_) => BucketType::Integer,
            Self::Decimal(_) => BucketType::Decimal,
            Self::Date(_) => BucketType::Date,
            Self::Time(_) => BucketType::Time,
            Self::Timestamp(_) => BucketType::Timestamp,
            Self::MultipleChoice(_) => BucketType::MultipleChoice,
        }
    }

    /// Check whether `value` falls inside this bucket.
    ///
    /// Values of a different kind than the bucket never match.
    pub fn matches(&self, value: &AnswerValue) -> bool {
        match (self, value) {
            (Self::Integer(interval), AnswerValue::Integer(i)) => interval.contains(i),
            (Self::Decimal(interval), AnswerValue::Decimal(d)) => interval.contains(d),
            (Self::Date(interval), AnswerValue::Date(date)) => interval.contains(date),
            (Self::Time(interval), AnswerValue::Time(time)) => interval.contains(time),
            (Self::Timestamp(interval), AnswerValue::Timestamp(stamp)) => interval.contains(stamp),
            (Self::MultipleChoice(ChoiceSelector::Id(id)), AnswerValue::Choice(selected)) => {
                &selected.choice_id == id
            }
            (Self::MultipleChoice(ChoiceSelector::Number(n)), AnswerValue::Choice(selected)) => {
                selected.choice_number == *n
            }
            _ => false,
        }
    }

    /// Check whether some answer to `node` would match both buckets.
    pub fn overlaps(&self, other: &Self, node: &Node) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.overlaps(b),
            (Self::Decimal(a), Self::Decimal(b)) => a.overlaps(b),
            (Self::Date(a), Self::Date(b)) => a.overlaps(b),
            (Self::Time(a), Self::Time(b)) => a.overlaps(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.overlaps(b),
            (Self::MultipleChoice(a), Self::MultipleChoice(b)) => {
                match (a.resolve(node), b.resolve(node)) {
                    (Some(a), Some(b)) => a.number == b.number,
                    _ => a == b,
                }
            }
            _ => false,
        }
    }

    /// Check that this bucket can gate sub-surveys of `node`.
    pub fn check_compatible(&self, node: &Node) -> Result<(), BucketError> {
        let answer_type = node.answer_type();
        if answer_type.bucket_type() != Some(self.bucket_type()) {
            return Err(BucketError::IncompatibleType {
                bucket_type: self.bucket_type(),
                answer_type,
            });
        }
        if let Self::MultipleChoice(selector) = self
            && selector.resolve(node).is_none()
        {
            return Err(BucketError::UnknownChoice(selector.clone()));
        }
        Ok(())
    }
}

fn parse_choice_selector(raw: &Value) -> Result<ChoiceSelector, BucketError> {
    let unparseable = |reason: &str| BucketError::Unparseable {
        bucket_type: BucketType::MultipleChoice,
        text: raw.to_string(),
        reason: reason.to_string(),
    };

    if let Some(id) = raw.get("choice_id") {
        let id = id
            .as_str()
            .ok_or_else(|| unparseable("choice_id must be a string"))?;
        return Ok(ChoiceSelector::Id(ChoiceId::new(id)));
    }
    if let Some(number) = raw.get("choice_number") {
        let number = number
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| unparseable("choice_number must be a non-negative integer"))?;
        return Ok(ChoiceSelector::Number(number));
    }
    Err(unparseable("expected choice_id or choice_number"))
}

fn parse_interval<T, F>(
    bucket_type: BucketType,
    text: &str,
    mut parse_bound: F,
) -> Result<Interval<T>, BucketError>
where
    T: PartialOrd,
    F: FnMut(&str) -> Result<T, String>,
{
    let unparseable = |reason: String| BucketError::Unparseable {
        bucket_type,
        text: text.to_string(),
        reason,
    };

    let trimmed = text.trim();
    let lower_inclusive = match trimmed.chars().next() {
        Some('[') => true,
        Some('(') => false,
        _ => return Err(unparseable("must start with '[' or '('".to_string())),
    };
    let upper_inclusive = match trimmed.chars().last() {
        Some(']') if trimmed.len() > 1 => true,
        Some(')') if trimmed.len() > 1 => false,
        _ => return Err(unparseable("must end with ']' or ')'".to_string())),
    };
    let inner = &trimmed[1..trimmed.len() - 1];
    let (low, high) = inner
        .split_once(',')
        .ok_or_else(|| unparseable("missing ',' between bounds".to_string()))?;

    let mut bound = |side: &str, inclusive: bool| -> Result<Bound<T>, BucketError> {
        let side = side.trim();
        if side.is_empty() {
            return Ok(Bound::Unbounded);
        }
        let value = parse_bound(side).map_err(&unparseable)?;
        Ok(if inclusive {
            Bound::Included(value)
        } else {
            Bound::Excluded(value)
        })
    };
    let lower = bound(low, lower_inclusive)?;
    let upper = bound(high, upper_inclusive)?;

    Interval::new(lower, upper).ok_or_else(|| BucketError::EmptyInterval {
        bucket_type,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{AnswerType, SelectedChoice};

    fn integer(text: &str) -> Bucket {
        Bucket::parse_range(BucketType::Integer, text).unwrap()
    }

    #[test]
    fn closed_integer_range() {
        let bucket = integer("[1, 3]");
        assert!(bucket.matches(&AnswerValue::Integer(1)));
        assert!(bucket.matches(&AnswerValue::Integer(3)));
        assert!(!bucket.matches(&AnswerValue::Integer(0)));
        assert!(!bucket.matches(&AnswerValue::Integer(4)));
    }

    #[test]
    fn half_open_and_unbounded() {
        let bucket = integer("(1, 3)");
        assert!(!bucket.matches(&AnswerValue::Integer(1)));
        assert!(bucket.matches(&AnswerValue::Integer(2)));
        assert!(!bucket.matches(&AnswerValue::Integer(3)));

        let everything = integer("[,]");
        assert!(everything.matches(&AnswerValue::Integer(i64::MIN)));
        assert!(everything.matches(&AnswerValue::Integer(i64::MAX)));

        let at_most_five = integer("(, 5]");
        assert!(at_most_five.matches(&AnswerValue::Integer(-100)));
        assert!(!at_most_five.matches(&AnswerValue::Integer(6)));
    }

    #[test]
    fn decimal_range() {
        let bucket = Bucket::parse_range(BucketType::Decimal, "[0.2, 5.2]").unwrap();
        let decimal = |text: &str| AnswerValue::Decimal(Decimal::from_str_exact(text).unwrap());
        assert!(bucket.matches(&decimal("3.2")));
        assert!(bucket.matches(&decimal("5.20")));
        assert!(!bucket.matches(&decimal("5.200001")));
        assert!(!bucket.matches(&AnswerValue::Integer(3)));

        let above = Bucket::parse_range(BucketType::Decimal, "(0.3, 1]").unwrap();
        assert!(!above.matches(&decimal("0.3")));
        assert!(above.matches(&decimal("0.30000000000000001")));
    }

    #[test]
    fn date_range_uses_calendar_order() {
        let bucket =
            Bucket::parse_range(BucketType::Date, "[2015-01-01, 2015-02-01]").unwrap();
        let date = |text| AnswerValue::Date(temporal::parse_date(text).unwrap());
        assert!(bucket.matches(&date("2015-01-15")));
        assert!(!bucket.matches(&date("2015-03-01")));
        assert!(!bucket.matches(&date("2014-12-31")));
    }

    #[test]
    fn timestamp_range() {
        let bucket = Bucket::parse_range(
            BucketType::Timestamp,
            "[2015-01-01 1:11, 2015-01-01 2:22]",
        )
        .unwrap();
        let stamp = |text| AnswerValue::Timestamp(temporal::parse_timestamp(text).unwrap());
        assert!(bucket.matches(&stamp("2015-01-01 2:00")));
        assert!(!bucket.matches(&stamp("2015-01-01 3:40")));
    }

    #[test]
    fn choice_selectors() {
        let selected = AnswerValue::Choice(SelectedChoice {
            choice_id: ChoiceId::new("abc"),
            choice_number: 0,
        });
        assert!(Bucket::choice_number(0).matches(&selected));
        assert!(!Bucket::choice_number(1).matches(&selected));
        assert!(Bucket::choice_id("abc").matches(&selected));
        assert!(!Bucket::choice_id("def").matches(&selected));
    }

    #[test]
    fn parse_from_definition_json() {
        assert_eq!(
            Bucket::parse(BucketType::MultipleChoice, &json!({"choice_number": 2})).unwrap(),
            Bucket::choice_number(2)
        );
        assert_eq!(
            Bucket::parse(BucketType::MultipleChoice, &json!({"choice_id": "x"})).unwrap(),
            Bucket::choice_id("x")
        );
        assert_eq!(
            Bucket::parse(BucketType::Integer, &json!("[1, 3]")).unwrap(),
            integer("[1,3]")
        );
        assert!(Bucket::parse(BucketType::Integer, &json!(3)).is_err());
        assert!(Bucket::parse(BucketType::MultipleChoice, &json!({})).is_err());
    }

    #[test]
    fn malformed_ranges() {
        for text in ["1, 3", "[1 3]", "[a, 3]", "[1, 3", "[", "[NaN, 1]"] {
            assert!(
                matches!(
                    Bucket::parse_range(BucketType::Decimal, text),
                    Err(BucketError::Unparseable { .. })
                ),
                "{text} should not parse"
            );
        }
    }

    #[test]
    fn empty_ranges_refused() {
        assert!(matches!(
            Bucket::parse_range(BucketType::Integer, "[5, 1]"),
            Err(BucketError::EmptyInterval { .. })
        ));
        assert!(matches!(
            Bucket::parse_range(BucketType::Integer, "[3, 3)"),
            Err(BucketError::EmptyInterval { .. })
        ));
        assert!(Bucket::parse_range(BucketType::Integer, "[3, 3]").is_ok());
    }

    #[test]
    fn overlap_detection() {
        let node = Node::new("n", AnswerType::Integer);
        assert!(!integer("[0, 5]").overlaps(&integer("[7, 10]"), &node));
        assert!(integer("[0, 5]").overlaps(&integer("[5, 10]"), &node));
        assert!(!integer("[0, 5)").overlaps(&integer("[5, 10]"), &node));
        assert!(integer("[,]").overlaps(&integer("[100, 200]"), &node));
    }

    #[test]
    fn choice_overlap_resolves_selectors() {
        let node = Node::multiple_choice("mc", crate::Choice::numbered(["a", "b"]));
        assert!(Bucket::choice_id("b").overlaps(&Bucket::choice_number(1), &node));
        assert!(!Bucket::choice_id("a").overlaps(&Bucket::choice_number(1), &node));
    }

    #[test]
    fn compatibility() {
        let integer_node = Node::new("n", AnswerType::Integer);
        assert!(integer("[1, 2]").check_compatible(&integer_node).is_ok());
        assert_eq!(
            Bucket::choice_number(0).check_compatible(&integer_node),
            Err(BucketError::IncompatibleType {
                bucket_type: BucketType::MultipleChoice,
                answer_type: AnswerType::Integer,
            })
        );

        let mc = Node::multiple_choice("mc", crate::Choice::numbered(["a"]));
        assert!(Bucket::choice_number(0).check_compatible(&mc).is_ok());
        assert_eq!(
            Bucket::choice_number(1).check_compatible(&mc),
            Err(BucketError::UnknownChoice(ChoiceSelector::Number(1)))
        );
    }
}
