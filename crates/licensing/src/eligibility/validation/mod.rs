//! Stateless checks applied to a license request. Each returns a
//! [`LicenseValidationResult`](super::LicenseValidationResult) and never errors.

mod age;
mod combination;
mod learner;

pub use age::{age_on, validate_age};
pub use combination::{held_categories, validate_combinations};
pub use learner::validate_learner_permit;
