use std::collections::HashMap;

use crate::{SubmittedAnswer, SurveyNodeId};

/// Lookup from survey node id to the answers submitted for it.
///
/// Answers are referred to by their position in the submitted list, and
/// answers sharing an id keep their submitted order. Built fresh for every
/// submission.
#[derive(Debug, Clone)]
pub struct AnswerIndex<'a> {
    answers: &'a [SubmittedAnswer],
    positions: HashMap<&'a SurveyNodeId, Vec<usize>>,
}

impl<'a> AnswerIndex<'a> {
    pub fn build(answers: &'a [SubmittedAnswer]) -> Self {
        let mut positions: HashMap<&SurveyNodeId, Vec<usize>> = HashMap::new();
        for (position, answer) in answers.iter().enumerate() {
            positions
                .entry(answer.survey_node_id())
                .or_default()
                .push(position);
        }
        Self { answers, positions }
    }

    /// Positions of the answers for `id`, in submitted order.
    ///
    /// Empty when nothing was submitted for `id`.
    pub fn positions(&self, id: &SurveyNodeId) -> &[usize] {
        self.positions.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The answers submitted for `id`, in submitted order.
    pub fn lookup(&self, id: &SurveyNodeId) -> impl Iterator<Item = &'a SubmittedAnswer> + '_ {
        self.positions(id)
            .iter()
            .map(|&position| &self.answers[position])
    }

    /// The answer at `position` of the submitted list.
    pub fn answer(&self, position: usize) -> &'a SubmittedAnswer {
        &self.answers[position]
    }

    /// All submitted answers with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a SubmittedAnswer)> + use<'a> {
        self.answers.iter().enumerate()
    }

    /// The number of submitted answers.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_submitted_order_per_id() {
        let answers = vec![
            SubmittedAnswer::answer("age", 20),
            SubmittedAnswer::answer("name", "Person"),
            SubmittedAnswer::answer("age", 30),
        ];
        let index = AnswerIndex::build(&answers);

        assert_eq!(index.positions(&SurveyNodeId::new("age")), &[0, 2]);
        let ages: Vec<_> = index
            .lookup(&SurveyNodeId::new("age"))
            .map(|answer| answer.response().as_i64().unwrap())
            .collect();
        assert_eq!(ages, vec![20, 30]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn unknown_id_is_empty() {
        let answers = vec![SubmittedAnswer::answer("age", 20)];
        let index = AnswerIndex::build(&answers);

        assert!(index.positions(&SurveyNodeId::new("missing")).is_empty());
        assert_eq!(index.lookup(&SurveyNodeId::new("missing")).count(), 0);
    }
}
