//! Serializable survey definitions, in the JSON shape surveys are stored in.
//!
//! A [`SurveyDefinition`] is unchecked data; converting it into a [`Survey`]
//! parses every bucket and runs the survey construction checks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    AnswerType, Bucket, BucketType, Choice, ChoiceId, Node, NodeId, SubSurvey, Survey,
    SurveyError, SurveyNode, SurveyNodeId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub nodes: Vec<SurveyNodeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyNodeDefinition {
    pub id: SurveyNodeId,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub repeatable: bool,

    pub node: NodeDefinition,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_surveys: Vec<SubSurveyDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: NodeId,

    #[serde(default)]
    pub title: String,

    pub type_constraint: AnswerType,

    #[serde(default)]
    pub allow_multiple: bool,

    #[serde(default)]
    pub allow_other: bool,

    #[serde(default)]
    pub allow_dont_know: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceDefinition {
    pub id: ChoiceId,

    /// Defaults to the choice's position in the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_number: Option<usize>,

    #[serde(default)]
    pub choice_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSurveyDefinition {
    #[serde(default)]
    pub repeatable: bool,

    pub buckets: Vec<BucketDefinition>,

    pub nodes: Vec<SurveyNodeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketDefinition {
    pub bucket_type: BucketType,

    /// Range text for ordered types, a choice object for multiple choice.
    pub bucket: Value,
}

impl TryFrom<SurveyDefinition> for Survey {
    type Error = SurveyError;

    fn try_from(definition: SurveyDefinition) -> Result<Self, Self::Error> {
        let nodes = definition
            .nodes
            .into_iter()
            .map(survey_node_from_definition)
            .collect::<Result<Vec<_>, _>>()?;
        Survey::new(nodes)
    }
}

fn survey_node_from_definition(
    definition: SurveyNodeDefinition,
) -> Result<SurveyNode, SurveyError> {
    let SurveyNodeDefinition {
        id,
        required,
        repeatable,
        node,
        sub_surveys,
    } = definition;

    let mut survey_node = SurveyNode::new(id.clone(), node_from_definition(node))
        .with_required(required)
        .with_repeatable(repeatable);

    for sub_survey in sub_surveys {
        let buckets = sub_survey
            .buckets
            .iter()
            .map(|bucket| Bucket::parse(bucket.bucket_type, &bucket.bucket))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SurveyError::MalformedBucket {
                survey_node_id: id.clone(),
                source,
            })?;
        let nodes = sub_survey
            .nodes
            .into_iter()
            .map(survey_node_from_definition)
            .collect::<Result<Vec<_>, _>>()?;

        let mut branch = SubSurvey::new(buckets, nodes);
        if sub_survey.repeatable {
            branch = branch.repeatable();
        }
        survey_node = survey_node.with_sub_survey(branch);
    }

    Ok(survey_node)
}

fn node_from_definition(definition: NodeDefinition) -> Node {
    let choices = definition
        .choices
        .into_iter()
        .enumerate()
        .map(|(position, choice)| {
            Choice::new(
                choice.id,
                choice.choice_number.unwrap_or(position),
                choice.choice_text,
            )
        })
        .collect();

    Node::new(definition.id, definition.type_constraint)
        .with_title(definition.title)
        .with_allow_multiple(definition.allow_multiple)
        .with_allow_other(definition.allow_other)
        .with_allow_dont_know(definition.allow_dont_know)
        .with_choices(choices)
}
