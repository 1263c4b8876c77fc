//! Example surveys, used by the integration tests and as input for
//! `dokomo-check`.

pub mod clinic_visit;
pub mod household;
pub mod sandwich;

pub use clinic_visit::{CLINIC_VISIT_JSON, clinic_visit};
pub use household::household_census;
pub use sandwich::sandwich_order;
