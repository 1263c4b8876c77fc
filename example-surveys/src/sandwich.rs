use dokomo::{AnswerType, Bucket, Choice, Node, SubSurvey, Survey, SurveyError, SurveyNode};

/// Breads on offer.
pub const BREADS: [&str; 3] = ["white", "wholegrain", "sourdough"];

/// Toppings on offer. Several may be picked.
pub const TOPPINGS: [&str; 4] = ["cheese", "tomato", "lettuce", "pickles"];

/// A sandwich order.
///
/// Picking cheese as a topping asks for the kind of cheese; sourdough asks
/// whether to toast it.
pub fn sandwich_order() -> Result<Survey, SurveyError> {
    Survey::new(vec![
        SurveyNode::new(
            "bread",
            Node::multiple_choice("bread", Choice::numbered(BREADS)).with_title("Bread"),
        )
        .required()
        .with_sub_survey(SubSurvey::new(
            vec![Bucket::choice_id("sourdough")],
            vec![
                SurveyNode::new(
                    "toasted",
                    Node::multiple_choice("toasted", Choice::numbered(["yes", "no"])),
                )
                .required(),
            ],
        )),
        SurveyNode::new(
            "toppings",
            Node::multiple_choice("toppings", Choice::numbered(TOPPINGS))
                .with_title("Toppings")
                .with_allow_multiple(true)
                .with_allow_other(true),
        )
        .with_sub_survey(SubSurvey::new(
            vec![Bucket::choice_id("cheese")],
            vec![
                SurveyNode::new("cheese-kind", Node::new("cheese-kind", AnswerType::Text))
                    .required(),
            ],
        )),
        SurveyNode::new(
            "length",
            Node::new("length", AnswerType::Integer).with_title("Length in cm"),
        ),
        SurveyNode::new("pickup", Node::new("pickup", AnswerType::Time)).required(),
    ])
}
