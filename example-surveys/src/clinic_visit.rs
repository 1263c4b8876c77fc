use anyhow::{Context, Result};
use dokomo::{Survey, SurveyDefinition};

/// The clinic visit survey in its stored JSON form.
pub const CLINIC_VISIT_JSON: &str = include_str!("../data/clinic_visit.json");

/// A clinic visit record, loaded from [`CLINIC_VISIT_JSON`].
///
/// Night-time arrivals need a reason, a temperature of 38 degrees or more
/// asks how long the fever has lasted, and a rash may come with a photo.
pub fn clinic_visit() -> Result<Survey> {
    let definition: SurveyDefinition =
        serde_json::from_str(CLINIC_VISIT_JSON).context("failed to parse clinic visit survey")?;
    Survey::try_from(definition).context("clinic visit survey is malformed")
}
