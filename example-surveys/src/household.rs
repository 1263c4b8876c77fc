use dokomo::{
    AnswerType, Bucket, BucketError, BucketType, Choice, Node, SubSurvey, Survey, SurveyError,
    SurveyNode,
};

/// Occupations offered for each household member.
pub const OCCUPATIONS: [&str; 4] = ["student", "employed", "retired", "unemployed"];

/// Where the household gets its water.
pub const WATER_SOURCES: [&str; 3] = ["well", "tap", "river"];

/// A household census.
///
/// The head count gates one round per member; employed members are asked
/// for their employer, and members born in 2015 or later for their school.
/// Households drawing from a well report its distance.
pub fn household_census() -> Result<Survey, SurveyError> {
    let member = SubSurvey::new(
        vec![range("members", BucketType::Integer, "[1,]")?],
        vec![
            SurveyNode::new("member-name", Node::new("name", AnswerType::Text).with_title("Name"))
                .required()
                .repeatable(),
            SurveyNode::new(
                "member-birthdate",
                Node::new("birthdate", AnswerType::Date).with_title("Date of birth"),
            )
            .required()
            .repeatable()
            .with_sub_survey(SubSurvey::new(
                vec![range("member-birthdate", BucketType::Date, "[2015-01-01,]")?],
                vec![
                    SurveyNode::new("member-school", Node::new("school", AnswerType::Text))
                        .repeatable(),
                ],
            )),
            SurveyNode::new(
                "member-occupation",
                Node::multiple_choice("occupation", Choice::numbered(OCCUPATIONS))
                    .with_title("Occupation")
                    .with_allow_other(true),
            )
            .repeatable()
            .with_sub_survey(SubSurvey::new(
                vec![Bucket::choice_id("employed")],
                vec![
                    SurveyNode::new("member-employer", Node::new("employer", AnswerType::Text))
                        .required()
                        .repeatable(),
                ],
            )),
        ],
    )
    .repeatable();

    Survey::new(vec![
        SurveyNode::new(
            "intro",
            Node::new("intro", AnswerType::Note).with_title("Thank you for taking part."),
        ),
        SurveyNode::new(
            "members",
            Node::new("members", AnswerType::Integer).with_title("How many people live here?"),
        )
        .required()
        .with_sub_survey(member),
        SurveyNode::new(
            "water-source",
            Node::multiple_choice("water-source", Choice::numbered(WATER_SOURCES))
                .with_allow_other(true)
                .with_allow_dont_know(true),
        )
        .required()
        .with_sub_survey(SubSurvey::new(
            vec![Bucket::choice_number(0)],
            vec![
                SurveyNode::new(
                    "well-distance",
                    Node::new("well-distance", AnswerType::Decimal)
                        .with_title("Distance to the well in km"),
                )
                .required(),
            ],
        )),
    ])
}

fn range(parent: &str, bucket_type: BucketType, text: &str) -> Result<Bucket, SurveyError> {
    Bucket::parse_range(bucket_type, text).map_err(|source: BucketError| {
        SurveyError::MalformedBucket {
            survey_node_id: parent.into(),
            source,
        }
    })
}
