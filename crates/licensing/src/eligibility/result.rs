use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::category::CategoryCode;

/// Requested category the applicant is too young for.
///
/// `required_age` is `None` when the category code is unknown to the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeViolation {
    pub category: String,
    pub required_age: Option<u8>,
    pub current_age: u32,
}

impl AgeViolation {
    pub fn is_unrecognized(&self) -> bool {
        self.required_age.is_none()
    }

    pub fn describe(&self) -> String {
        match self.required_age {
            Some(required) => format!(
                "{} requires age {} (applicant is {})",
                self.category, required, self.current_age
            ),
            None => format!("{} is not a recognized license category", self.category),
        }
    }
}

/// Outcome of a validation call.
///
/// The structured fields are authoritative; `message` is for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseValidationResult {
    is_valid: bool,
    message: String,
    missing_prerequisites: BTreeSet<CategoryCode>,
    age_violations: Vec<AgeViolation>,
    invalid_combinations: Vec<String>,
}

impl LicenseValidationResult {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
            missing_prerequisites: BTreeSet::new(),
            age_violations: Vec::new(),
            invalid_combinations: Vec::new(),
        }
    }

    /// Failure without structured detail, e.g. an empty request.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            ..Self::passed(message)
        }
    }

    pub fn age_failure(message: impl Into<String>, age_violations: Vec<AgeViolation>) -> Self {
        Self {
            age_violations,
            ..Self::rejected(message)
        }
    }

    pub fn combination_failure(
        message: impl Into<String>,
        missing_prerequisites: BTreeSet<CategoryCode>,
        invalid_combinations: Vec<String>,
    ) -> Self {
        Self {
            missing_prerequisites,
            invalid_combinations,
            ..Self::rejected(message)
        }
    }

    pub fn learner_permit_failure(
        message: impl Into<String>,
        missing_prerequisites: BTreeSet<CategoryCode>,
    ) -> Self {
        Self {
            missing_prerequisites,
            ..Self::rejected(message)
        }
    }

    pub fn duplicate_failure(message: impl Into<String>, duplicates: &BTreeSet<CategoryCode>) -> Self {
        Self {
            invalid_combinations: duplicates
                .iter()
                .map(|category| category.code().to_string())
                .collect(),
            ..Self::rejected(message)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn missing_prerequisites(&self) -> &BTreeSet<CategoryCode> {
        &self.missing_prerequisites
    }

    pub fn age_violations(&self) -> &[AgeViolation] {
        &self.age_violations
    }

    pub fn invalid_combinations(&self) -> &[String] {
        &self.invalid_combinations
    }
}
