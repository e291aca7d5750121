//! License category eligibility.
//!
//! A request passes through the age check, the prerequisite and combination check, the
//! learner's permit check (new licenses only), and duplicate blocking (new licenses and
//! permits), stopping at the first failure. Existing licenses come from a
//! [`LicenseRegistry`]; everything else is pure computation over the [`RuleBook`] and an
//! injected [`Clock`].

pub mod category;
pub mod clock;
pub mod domain;
pub mod engine;
pub mod registry;
pub mod resolver;
pub mod result;
pub mod router;
pub mod rules;
pub mod validation;

#[cfg(test)]
mod tests;

pub use category::{CategoryCode, CategoryRequest};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    ActiveLicense, ApplicationIntent, ExternalLicenseDetails, LicenseApplication, LicenseKind,
    LicenseStatus, PersonId,
};
pub use engine::LicenseEligibilityEngine;
pub use registry::{InMemoryLicenseRegistry, SnapshotError};
pub use resolver::{
    ExistingLicenseResolver, ExistingLicenseSummary, LicenseRegistry, RegistryError,
    RegistryFailurePolicy,
};
pub use result::{AgeViolation, LicenseValidationResult};
pub use router::eligibility_router;
pub use rules::{
    CategoryRule, CombinationWhitelist, LearnerPermitScope, Prerequisite, RuleBook,
    RuleBookError,
};
pub use validation::{age_on, validate_age, validate_combinations, validate_learner_permit};
