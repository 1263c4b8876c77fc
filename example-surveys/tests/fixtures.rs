//! Validation of realistic submissions against the example surveys

use dokomo::{
    Rejection, Response, SubmissionBuilder, SubmittedAnswer, SurveyNodeId, UnreachableAnswers,
    ValidationOptions, Validator, validate,
};
use example_surveys::{clinic_visit, household_census, sandwich_order};

const CLINIC_VISIT_SUBMISSION: &str = include_str!("../data/clinic_visit_submission.json");

fn skipped(id: &str, round: Option<usize>) -> Rejection {
    Rejection::SkippedRequiredQuestion {
        survey_node_id: SurveyNodeId::new(id),
        round,
    }
}

fn two_member_household() -> SubmissionBuilder {
    SubmissionBuilder::new()
        .with_int("members", 2)
        .with_text("member-name", "Ana")
        .with_text("member-birthdate", "1980-05-01")
        .with_choice("member-occupation", "employed")
        .with_text("member-employer", "Mill")
        .with_text("member-name", "Ben")
        .with_text("member-birthdate", "2016-03-02")
        .with_text("member-school", "Hill School")
        .with_choice("member-occupation", "student")
}

#[test]
fn test_household_complete() {
    let survey = household_census().unwrap();

    let accepted = two_member_household()
        .with_choice("water-source", "well")
        .with_decimal("well-distance", 1.5)
        .validate(&survey)
        .unwrap();

    assert_eq!(accepted.len(), 11);
    assert_eq!(accepted[0].survey_node_id.as_str(), "members");
    assert_eq!(accepted[10].survey_node_id.as_str(), "well-distance");
}

#[test]
fn test_household_employed_member_needs_employer() {
    let survey = household_census().unwrap();

    let verdict = SubmissionBuilder::new()
        .with_int("members", 1)
        .with_text("member-name", "Ana")
        .with_text("member-birthdate", "1980-05-01")
        .with_choice("member-occupation", "employed")
        .with_choice("water-source", "tap")
        .validate(&survey);

    assert_eq!(verdict, Err(skipped("member-employer", Some(0))));
}

#[test]
fn test_household_missing_second_member() {
    let survey = household_census().unwrap();

    let verdict = SubmissionBuilder::new()
        .with_int("members", 2)
        .with_text("member-name", "Ana")
        .with_text("member-birthdate", "1980-05-01")
        .with_choice("water-source", "tap")
        .validate(&survey);

    let rejection = verdict.unwrap_err();
    assert_eq!(rejection, skipped("member-name", Some(1)));
    assert_eq!(
        rejection.to_string(),
        "SurveyNode member-name was skipped in round 2"
    );
}

#[test]
fn test_household_distance_only_for_wells() {
    let survey = household_census().unwrap();
    let answers = two_member_household()
        .with_choice("water-source", "river")
        .with_decimal("well-distance", 1.5)
        .build();

    assert!(matches!(
        validate(&survey, &answers),
        Err(Rejection::OrphanedAnswer { position: 10, .. })
    ));

    let lenient = Validator::new(&survey).with_options(
        ValidationOptions::new().with_unreachable_answers(UnreachableAnswers::Drop),
    );
    assert_eq!(lenient.validate(&answers).unwrap().len(), 10);
}

#[test]
fn test_household_unsure_of_water_source() {
    let survey = household_census().unwrap();

    let accepted = two_member_household()
        .with_dont_know("water-source")
        .validate(&survey)
        .unwrap();

    assert_eq!(accepted[9].response, Response::DontKnow(String::new()));
}

#[test]
fn test_sandwich_with_cheese() {
    let survey = sandwich_order().unwrap();

    let accepted = SubmissionBuilder::new()
        .with_choice("bread", "sourdough")
        .with_choice("toasted", "yes")
        .with_choice("toppings", "tomato")
        .with_choice("toppings", "cheese")
        .with_text("cheese-kind", "cheddar")
        .with_other("toppings", "olives")
        .with_text("pickup", "12:30")
        .validate(&survey)
        .unwrap();

    assert_eq!(accepted.len(), 7);
}

#[test]
fn test_sandwich_cheese_kind_required() {
    let survey = sandwich_order().unwrap();

    let verdict = SubmissionBuilder::new()
        .with_choice("bread", "white")
        .with_choice("toppings", "cheese")
        .with_text("pickup", "12:30")
        .validate(&survey);

    assert_eq!(verdict, Err(skipped("cheese-kind", None)));
}

#[test]
fn test_sandwich_sourdough_asks_about_toasting() {
    let survey = sandwich_order().unwrap();

    let verdict = SubmissionBuilder::new()
        .with_choice("bread", "sourdough")
        .with_text("pickup", "12:30")
        .validate(&survey);

    assert_eq!(verdict, Err(skipped("toasted", None)));
}

#[test]
fn test_clinic_visit_submission_file() {
    let survey = clinic_visit().unwrap();
    let answers: Vec<SubmittedAnswer> = serde_json::from_str(CLINIC_VISIT_SUBMISSION).unwrap();

    let accepted = validate(&survey, &answers).unwrap();

    assert_eq!(accepted.len(), answers.len());
    assert_eq!(
        accepted[7].response,
        Response::Other("dizziness".to_string())
    );
}

#[test]
fn test_clinic_night_arrival_needs_reason() {
    let survey = clinic_visit().unwrap();
    let answers: Vec<SubmittedAnswer> = serde_json::from_str(CLINIC_VISIT_SUBMISSION).unwrap();
    let without_reason: Vec<_> = answers
        .into_iter()
        .filter(|answer| answer.survey_node_id().as_str() != "night-reason")
        .collect();

    assert_eq!(
        validate(&survey, &without_reason),
        Err(skipped("night-reason", None))
    );
}

#[test]
fn test_clinic_unknown_temperature_skips_fever_questions() {
    let survey = clinic_visit().unwrap();

    let accepted = SubmissionBuilder::new()
        .with_response(
            "clinic",
            serde_json::json!({
                "facility_id": "f-17",
                "facility_name": "Riverside",
                "facility_sector": "public",
                "lng": 36.82,
                "lat": -1.29,
            }),
        )
        .with_text("arrival", "2015-01-01 09:00")
        .with_dont_know("temperature")
        .validate(&survey)
        .unwrap();

    assert_eq!(accepted.len(), 3);
}
