//! Walks a survey's node tree against a submission.
//!
//! The walk visits survey nodes depth first in declared order. Each visited
//! node takes its next unconsumed answer from the [`AnswerIndex`]; a typed
//! answer that falls in one of the node's buckets pulls the traversal into
//! that sub-survey, once or in rounds when the sub-survey is repeatable.
//! Anything left unconsumed afterwards was never reachable.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    AnswerError, AnswerIndex, AnswerValue, Rejection, Response, ResponseType, SubSurvey,
    SubmittedAnswer, Survey, SurveyNode, SurveyNodeId, UnreachableAnswers, ValidatedAnswer,
    ValidationOptions,
};

/// Outcome of validating one submission: the normalized answers in submitted
/// order, or the first violation found.
pub type Verdict = Result<Vec<ValidatedAnswer>, Rejection>;

/// Validate `answers` against `survey` with default options.
pub fn validate(survey: &Survey, answers: &[SubmittedAnswer]) -> Verdict {
    Validator::new(survey).validate(answers)
}

/// Validates submissions against one survey.
///
/// Holds no per-submission state, so a single validator can be shared
/// across threads and reused for any number of submissions.
#[derive(Debug, Clone)]
pub struct Validator<'s> {
    survey: &'s Survey,
    options: ValidationOptions,
}

impl<'s> Validator<'s> {
    pub fn new(survey: &'s Survey) -> Self {
        Self {
            survey,
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate one submission.
    ///
    /// Returns every accepted answer, normalized and in submitted order, or
    /// the first rule the submission breaks.
    pub fn validate(&self, answers: &[SubmittedAnswer]) -> Verdict {
        debug!(answers = answers.len(), "validating submission");

        let mut traversal = Traversal::new(answers, &self.options);
        let accepted = traversal.visit_sequence(self.survey.nodes(), Visit::Single, Vec::new())?;
        traversal.check_leftovers(self.survey)?;

        Ok(in_submitted_order(accepted))
    }
}

/// How a survey node is being visited.
#[derive(Debug, Clone, Copy)]
enum Visit {
    /// Outside any repeatable sub-survey.
    Single,
    /// Inside round `n` (zero-based) of a repeatable sub-survey.
    Round(usize),
}

impl Visit {
    fn round(self) -> Option<usize> {
        match self {
            Self::Single => None,
            Self::Round(round) => Some(round),
        }
    }
}

/// Accepted answers keyed by their submitted position.
type Accepted = Vec<(usize, ValidatedAnswer)>;

/// Per-submission traversal state.
struct Traversal<'a> {
    index: AnswerIndex<'a>,
    /// How many answers each survey node has taken so far.
    cursors: HashMap<&'a SurveyNodeId, usize>,
    consumed: Vec<bool>,
    options: &'a ValidationOptions,
}

impl<'a> Traversal<'a> {
    fn new(answers: &'a [SubmittedAnswer], options: &'a ValidationOptions) -> Self {
        let index = AnswerIndex::build(answers);
        Self {
            consumed: vec![false; index.len()],
            index,
            cursors: HashMap::new(),
            options,
        }
    }

    fn visit_sequence(
        &mut self,
        nodes: &'a [SurveyNode],
        visit: Visit,
        mut accepted: Accepted,
    ) -> Result<Accepted, Rejection> {
        for survey_node in nodes {
            accepted = self.visit_node(survey_node, visit, accepted)?;
        }
        Ok(accepted)
    }

    fn visit_node(
        &mut self,
        survey_node: &'a SurveyNode,
        visit: Visit,
        mut accepted: Accepted,
    ) -> Result<Accepted, Rejection> {
        // A non-repeatable node is asked once, however many rounds reach it.
        if !survey_node.is_repeatable() && self.cursors.contains_key(survey_node.id()) {
            return Ok(accepted);
        }

        let taken = self.take(survey_node, visit);

        if taken.is_empty() {
            if survey_node.is_required() {
                return Err(Rejection::SkippedRequiredQuestion {
                    survey_node_id: survey_node.id().clone(),
                    round: visit.round(),
                });
            }
            trace!(survey_node_id = %survey_node.id(), "optional node left unanswered");
            return Ok(accepted);
        }

        for position in taken {
            let answer = normalize(survey_node, self.index.answer(position))?;
            if let Response::Answer(value) = &answer.response {
                accepted = self.enter_branch(survey_node, value, visit, accepted)?;
            }
            accepted.push((position, answer));
        }
        Ok(accepted)
    }

    /// Consume the answers `survey_node` takes on this visit.
    ///
    /// Inside a round every node takes at most one answer; elsewhere a node
    /// allowing multiple answers takes all that remain.
    fn take(&mut self, survey_node: &'a SurveyNode, visit: Visit) -> Vec<usize> {
        let remaining = self.remaining(survey_node.id());
        let taken = match visit {
            Visit::Single if survey_node.node().allows_multiple() => remaining,
            Visit::Single | Visit::Round(_) => &remaining[..remaining.len().min(1)],
        }
        .to_vec();

        *self.cursors.entry(survey_node.id()).or_insert(0) += taken.len();
        for &position in &taken {
            self.consumed[position] = true;
        }
        taken
    }

    /// Positions of the answers for `id` not yet taken.
    fn remaining(&self, id: &SurveyNodeId) -> &[usize] {
        let positions = self.index.positions(id);
        let cursor = self.cursors.get(id).copied().unwrap_or(0);
        &positions[cursor.min(positions.len())..]
    }

    fn enter_branch(
        &mut self,
        survey_node: &'a SurveyNode,
        value: &AnswerValue,
        visit: Visit,
        accepted: Accepted,
    ) -> Result<Accepted, Rejection> {
        let Some(sub_survey) = survey_node.select_sub_survey(value) else {
            if !survey_node.sub_surveys().is_empty() {
                trace!(survey_node_id = %survey_node.id(), "answer selects no sub-survey");
            }
            return Ok(accepted);
        };

        debug!(
            survey_node_id = %survey_node.id(),
            repeatable = sub_survey.is_repeatable(),
            "entering sub-survey"
        );
        if sub_survey.is_repeatable() {
            self.run_rounds(survey_node, sub_survey, value, visit, accepted)
        } else {
            self.visit_sequence(sub_survey.nodes(), visit, accepted)
        }
    }

    /// Visit a repeatable sub-survey once per round.
    ///
    /// Only repeatable children are asked again in every round. The others
    /// are asked once, in their declared place during the first round, or
    /// after the fact when no round is visited.
    ///
    /// An integer gating answer fixes the round count when the options say
    /// so. Otherwise rounds continue while any repeatable child has answers
    /// left, and at least one round is always visited.
    fn run_rounds(
        &mut self,
        survey_node: &'a SurveyNode,
        sub_survey: &'a SubSurvey,
        value: &AnswerValue,
        visit: Visit,
        mut accepted: Accepted,
    ) -> Result<Accepted, Rejection> {
        let declared = match value {
            AnswerValue::Integer(count) if self.options.rounds_from_integer_answer => {
                Some(usize::try_from(*count).unwrap_or(0))
            }
            _ => None,
        };
        let repeated: Vec<&'a SurveyNode> = sub_survey
            .nodes()
            .iter()
            .filter(|child| child.is_repeatable())
            .collect();
        let any_required = repeated.iter().any(|child| child.is_required());

        let mut round = 0;
        loop {
            let pending = repeated
                .iter()
                .any(|child| !self.remaining(child.id()).is_empty());
            let another = match declared {
                // Rounds with nothing pending and nothing required accept nothing.
                Some(count) => round < count && (pending || any_required),
                None => round == 0 || pending,
            };
            if !another {
                break;
            }

            trace!(survey_node_id = %survey_node.id(), round, "entering round");
            for child in sub_survey.nodes() {
                let child_visit = if child.is_repeatable() {
                    Visit::Round(round)
                } else {
                    visit
                };
                accepted = self.visit_node(child, child_visit, accepted)?;
            }
            round += 1;
        }

        if round == 0 {
            for child in sub_survey.nodes().iter().filter(|child| !child.is_repeatable()) {
                accepted = self.visit_node(child, visit, accepted)?;
            }
        }

        debug!(survey_node_id = %survey_node.id(), rounds = round, "repeatable sub-survey done");
        Ok(accepted)
    }

    /// Reject or drop every answer the traversal did not consume.
    fn check_leftovers(&self, survey: &Survey) -> Result<(), Rejection> {
        for (position, answer) in self.index.iter() {
            if self.consumed[position] {
                continue;
            }

            let survey_node_id = answer.survey_node_id().clone();
            if !survey.contains(&survey_node_id) {
                return Err(Rejection::SurveyNodeNotFound {
                    survey_node_id,
                    position,
                });
            }

            match self.options.unreachable_answers {
                UnreachableAnswers::Reject => {
                    return Err(Rejection::OrphanedAnswer {
                        survey_node_id,
                        position,
                    });
                }
                UnreachableAnswers::Drop => {
                    debug!(%survey_node_id, position, "dropping unreachable answer");
                }
            }
        }
        Ok(())
    }
}

/// Check one answer against its node and bring it into stored form.
fn normalize(
    survey_node: &SurveyNode,
    answer: &SubmittedAnswer,
) -> Result<ValidatedAnswer, Rejection> {
    let node = survey_node.node();
    let survey_node_id = survey_node.id();
    let expected = node.answer_type();

    if let Some(claimed) = answer.type_constraint()
        && claimed != expected
    {
        return Err(Rejection::TypeConstraintMismatch {
            survey_node_id: survey_node_id.clone(),
            claimed,
            expected,
        });
    }

    let invalid = |source| Rejection::InvalidAnswer {
        survey_node_id: survey_node_id.clone(),
        source,
    };

    let response = match answer.response_type() {
        ResponseType::Answer => {
            Response::Answer(AnswerValue::parse(node, answer.response()).map_err(invalid)?)
        }
        ResponseType::Other if node.allows_other() => {
            Response::Other(free_text(answer.response()).map_err(invalid)?)
        }
        ResponseType::DontKnow if node.allows_dont_know() => {
            Response::DontKnow(free_text(answer.response()).map_err(invalid)?)
        }
        response_type => {
            return Err(Rejection::ResponseTypeNotAllowed {
                survey_node_id: survey_node_id.clone(),
                response_type,
            });
        }
    };

    Ok(ValidatedAnswer {
        survey_node_id: survey_node_id.clone(),
        answer_type: expected,
        response,
    })
}

/// Payload of an `other` or `dont_know` response. Missing text reads as empty.
fn free_text(raw: &Value) -> Result<String, AnswerError> {
    match raw {
        Value::String(text) => Ok(text.clone()),
        Value::Null => Ok(String::new()),
        other => Err(AnswerError::WrongShape {
            expected: "text",
            found: other.to_string(),
        }),
    }
}

fn in_submitted_order(mut accepted: Accepted) -> Vec<ValidatedAnswer> {
    accepted.sort_by_key(|(position, _)| *position);
    accepted.into_iter().map(|(_, answer)| answer).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{AnswerType, Bucket, Choice, Node};

    fn integer(id: &str) -> SurveyNode {
        SurveyNode::new(id, Node::new(id, AnswerType::Integer))
    }

    fn text(id: &str) -> SurveyNode {
        SurveyNode::new(id, Node::new(id, AnswerType::Text))
    }

    #[test]
    fn empty_survey_accepts_empty_submission() {
        let survey = Survey::new(vec![]).unwrap();
        assert_eq!(validate(&survey, &[]).unwrap(), vec![]);
    }

    #[test]
    fn empty_survey_refuses_any_answer() {
        let survey = Survey::new(vec![]).unwrap();
        let rejection = validate(&survey, &[SubmittedAnswer::answer("x", 1)]).unwrap_err();
        assert!(matches!(
            rejection,
            Rejection::SurveyNodeNotFound { position: 0, .. }
        ));
    }

    #[test]
    fn output_follows_submitted_order() {
        let survey = Survey::new(vec![integer("a"), text("b")]).unwrap();
        let answers = vec![
            SubmittedAnswer::answer("b", "second"),
            SubmittedAnswer::answer("a", 1),
        ];

        let accepted = validate(&survey, &answers).unwrap();
        let ids: Vec<_> = accepted
            .iter()
            .map(|answer| answer.survey_node_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn second_answer_for_single_node_is_orphaned() {
        let survey = Survey::new(vec![integer("a")]).unwrap();
        let answers = vec![SubmittedAnswer::answer("a", 1), SubmittedAnswer::answer("a", 2)];

        let rejection = validate(&survey, &answers).unwrap_err();
        assert_eq!(
            rejection,
            Rejection::OrphanedAnswer {
                survey_node_id: SurveyNodeId::new("a"),
                position: 1,
            }
        );
    }

    #[test]
    fn allow_multiple_takes_every_answer() {
        let survey = Survey::new(vec![SurveyNode::new(
            "a",
            Node::new("a", AnswerType::Integer).with_allow_multiple(true),
        )])
        .unwrap();
        let answers = vec![SubmittedAnswer::answer("a", 1), SubmittedAnswer::answer("a", 2)];

        assert_eq!(validate(&survey, &answers).unwrap().len(), 2);
    }

    #[test]
    fn dont_know_without_payload_is_empty_text() {
        let survey = Survey::new(vec![SurveyNode::new(
            "a",
            Node::new("a", AnswerType::Integer).with_allow_dont_know(true),
        )
        .required()])
        .unwrap();

        let accepted = validate(&survey, &[SubmittedAnswer::dont_know("a")]).unwrap();
        assert_eq!(accepted[0].response, Response::DontKnow(String::new()));
    }

    #[test]
    fn other_payload_must_be_text() {
        let survey = Survey::new(vec![SurveyNode::new(
            "mc",
            Node::multiple_choice("mc", Choice::numbered(["a", "b"])).with_allow_other(true),
        )])
        .unwrap();
        let answer: SubmittedAnswer = serde_json::from_value(json!({
            "survey_node_id": "mc",
            "response": {"response_type": "other", "response": 5},
        }))
        .unwrap();

        let rejection = validate(&survey, &[answer]).unwrap_err();
        assert!(matches!(rejection, Rejection::InvalidAnswer { .. }));
    }

    #[test]
    fn other_response_never_selects_a_branch() {
        let survey = Survey::new(vec![
            SurveyNode::new(
                "mc",
                Node::multiple_choice("mc", Choice::numbered(["a", "b"])).with_allow_other(true),
            )
            .with_sub_survey(SubSurvey::new(
                vec![Bucket::choice_number(0)],
                vec![text("follow-up").required()],
            )),
        ])
        .unwrap();

        let accepted = validate(&survey, &[SubmittedAnswer::other("mc", "c")]).unwrap();
        assert_eq!(accepted[0].response, Response::Other("c".to_string()));
    }

    #[test]
    fn negative_round_count_means_no_rounds() {
        let survey = Survey::new(vec![
            integer("count").required().with_sub_survey(
                SubSurvey::new(
                    vec![Bucket::parse_range(crate::BucketType::Integer, "[,]").unwrap()],
                    vec![text("name").required().repeatable()],
                )
                .repeatable(),
            ),
        ])
        .unwrap();

        assert_eq!(
            validate(&survey, &[SubmittedAnswer::answer("count", -1)])
                .unwrap()
                .len(),
            1
        );
    }
}
