use std::collections::HashSet;

use crate::{AnswerValue, Bucket, BucketError, Node, SurveyError, SurveyNodeId};

/// A node placed at one position of a survey or sub-survey.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyNode {
    id: SurveyNodeId,

    node: Node,

    /// An answer must be given whenever traversal reaches this node.
    required: bool,

    /// Answered once per round of the enclosing repeatable sub-survey.
    repeatable: bool,

    /// Branches entered when this node's answer falls in their buckets.
    sub_surveys: Vec<SubSurvey>,
}

impl SurveyNode {
    /// Place a question. The placement starts optional, not repeatable,
    /// and without sub-surveys.
    pub fn new(id: impl Into<SurveyNodeId>, node: Node) -> Self {
        Self {
            id: id.into(),
            node,
            required: false,
            repeatable: false,
            sub_surveys: Vec::new(),
        }
    }

    /// Mark this placement as required.
    pub fn required(self) -> Self {
        self.with_required(true)
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark this placement as repeatable.
    pub fn repeatable(self) -> Self {
        self.with_repeatable(true)
    }

    pub fn with_repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }

    /// Append a sub-survey after any existing ones.
    pub fn with_sub_survey(mut self, sub_survey: SubSurvey) -> Self {
        self.sub_surveys.push(sub_survey);
        self
    }

    pub fn id(&self) -> &SurveyNodeId {
        &self.id
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Check if an answer is required when traversal reaches this node.
    ///
    /// Notes are never required, whatever their flag says.
    pub fn is_required(&self) -> bool {
        self.required && !self.node.answer_type().is_note()
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub fn sub_surveys(&self) -> &[SubSurvey] {
        &self.sub_surveys
    }

    /// The first declared sub-survey whose buckets accept `value`.
    pub fn select_sub_survey(&self, value: &AnswerValue) -> Option<&SubSurvey> {
        self.sub_surveys
            .iter()
            .find(|sub_survey| sub_survey.accepts(value))
    }
}

/// A branch of questions entered conditionally on its parent's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SubSurvey {
    buckets: Vec<Bucket>,

    /// The branch is answered in rounds, once per repetition.
    repeatable: bool,

    nodes: Vec<SurveyNode>,
}

impl SubSurvey {
    pub fn new(buckets: Vec<Bucket>, nodes: Vec<SurveyNode>) -> Self {
        Self {
            buckets,
            repeatable: false,
            nodes,
        }
    }

    /// Mark this branch as answered in rounds.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub fn nodes(&self) -> &[SurveyNode] {
        &self.nodes
    }

    /// Check if any of this branch's buckets accepts `value`.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        self.buckets.iter().any(|bucket| bucket.matches(value))
    }
}

/// The root of a survey's node tree.
///
/// A `Survey` can only be obtained through [`Survey::new`] (or from a
/// [`SurveyDefinition`](crate::SurveyDefinition)), so every value has
/// passed the construction checks: unique ids, sound buckets and repeatable
/// nodes only inside repeatable sub-surveys.
#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    nodes: Vec<SurveyNode>,

    /// Every survey node id in the tree, sub-surveys included.
    ids: HashSet<SurveyNodeId>,
}

impl Survey {
    /// Check and assemble a survey from its top-level nodes.
    pub fn new(nodes: Vec<SurveyNode>) -> Result<Self, SurveyError> {
        let mut ids = HashSet::new();
        check_nodes(&nodes, false, &mut ids)?;
        Ok(Self { nodes, ids })
    }

    /// Get the top-level nodes.
    pub fn nodes(&self) -> &[SurveyNode] {
        &self.nodes
    }

    /// Check if a survey node id appears anywhere in the tree.
    pub fn contains(&self, id: &SurveyNodeId) -> bool {
        self.ids.contains(id)
    }

    /// Check if the survey has any questions.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of survey nodes in the whole tree.
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }
}

fn check_nodes(
    nodes: &[SurveyNode],
    in_repeatable: bool,
    ids: &mut HashSet<SurveyNodeId>,
) -> Result<(), SurveyError> {
    for survey_node in nodes {
        let id = survey_node.id();
        if !ids.insert(id.clone()) {
            return Err(SurveyError::DuplicateSurveyNode(id.clone()));
        }
        if survey_node.is_repeatable() && !in_repeatable {
            return Err(SurveyError::RepeatableOutsideRepeatableSubSurvey(id.clone()));
        }
        check_choices(survey_node)?;

        for sub_survey in survey_node.sub_surveys() {
            if sub_survey.buckets().is_empty() {
                return Err(SurveyError::MalformedBucket {
                    survey_node_id: id.clone(),
                    source: BucketError::NoBuckets,
                });
            }
            for bucket in sub_survey.buckets() {
                bucket
                    .check_compatible(survey_node.node())
                    .map_err(|source| SurveyError::MalformedBucket {
                        survey_node_id: id.clone(),
                        source,
                    })?;
            }
            check_nodes(
                sub_survey.nodes(),
                in_repeatable || sub_survey.is_repeatable(),
                ids,
            )?;
        }

        warn_on_overlapping_siblings(survey_node);
    }
    Ok(())
}

fn check_choices(survey_node: &SurveyNode) -> Result<(), SurveyError> {
    let mut choice_ids = HashSet::new();
    let mut numbers = HashSet::new();
    for choice in survey_node.node().choices() {
        if !choice_ids.insert(&choice.id) || !numbers.insert(choice.number) {
            return Err(SurveyError::DuplicateChoice {
                survey_node_id: survey_node.id().clone(),
                choice: choice.id.clone(),
            });
        }
    }
    Ok(())
}

/// Sibling sub-surveys whose buckets overlap are accepted; the first declared
/// match wins at validation time.
fn warn_on_overlapping_siblings(survey_node: &SurveyNode) {
    let sub_surveys = survey_node.sub_surveys();
    for (i, first) in sub_surveys.iter().enumerate() {
        for (j, second) in sub_surveys.iter().enumerate().skip(i + 1) {
            let overlapping = first.buckets().iter().any(|a| {
                second
                    .buckets()
                    .iter()
                    .any(|b| a.overlaps(b, survey_node.node()))
            });
            if overlapping {
                tracing::warn!(
                    survey_node_id = %survey_node.id(),
                    first = i,
                    second = j,
                    "sibling sub-surveys have overlapping buckets; the first declared one wins"
                );
            }
        }
    }
}
