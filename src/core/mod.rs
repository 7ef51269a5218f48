mod engine;
mod finance;
pub mod history;
mod types;

pub use engine::{project, validate_age_range};
pub use finance::{future_value_of_annuity, present_value};
pub use types::{
    ContributionMode, Projection, ProjectionRow, ScenarioInput, ValidationError, Verdict,
};
