use crate::{AnswerType, ChoiceId, NodeId};

/// A reusable question definition, independent of where it is placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,

    /// The prompt text shown to the submitter.
    title: String,

    answer_type: AnswerType,

    /// Several answers may be given in one visit (e.g. multi-select).
    allow_multiple: bool,

    /// Free-text `other` responses are accepted.
    allow_other: bool,

    /// `dont_know` responses are accepted.
    allow_dont_know: bool,

    /// Options offered by a multiple-choice question, in display order.
    choices: Vec<Choice>,
}

impl Node {
    /// Create a new question with all flags off and no choices.
    pub fn new(id: impl Into<NodeId>, answer_type: AnswerType) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            answer_type,
            allow_multiple: false,
            allow_other: false,
            allow_dont_know: false,
            choices: Vec::new(),
        }
    }

    /// Create a multiple-choice question offering the given choices.
    pub fn multiple_choice(id: impl Into<NodeId>, choices: Vec<Choice>) -> Self {
        Self::new(id, AnswerType::MultipleChoice).with_choices(choices)
    }

    /// Set the prompt text.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    pub fn with_allow_other(mut self, allow: bool) -> Self {
        self.allow_other = allow;
        self
    }

    pub fn with_allow_dont_know(mut self, allow: bool) -> Self {
        self.allow_dont_know = allow;
        self
    }

    /// Replace the offered choices.
    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn answer_type(&self) -> AnswerType {
        self.answer_type
    }

    pub fn allows_multiple(&self) -> bool {
        self.allow_multiple
    }

    pub fn allows_other(&self) -> bool {
        self.allow_other
    }

    pub fn allows_dont_know(&self) -> bool {
        self.allow_dont_know
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Look up an offered choice by its id.
    pub fn choice_by_id(&self, id: &ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|choice| &choice.id == id)
    }

    /// Look up an offered choice by its number.
    pub fn choice_by_number(&self, number: usize) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.number == number)
    }
}

/// One option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: ChoiceId,

    /// Zero-based position of the choice within its question.
    pub number: usize,

    pub text: String,
}

impl Choice {
    pub fn new(id: impl Into<ChoiceId>, number: usize, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number,
            text: text.into(),
        }
    }

    /// Build a choice list from texts, numbering them in order and using
    /// the text as the id.
    pub fn numbered<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(number, text)| {
                let text = text.into();
                Self::new(text.clone(), number, text)
            })
            .collect()
    }
}
