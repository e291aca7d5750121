use chrono::{Datelike, NaiveDate};

use super::super::category::{join_codes, CategoryRequest};
use super::super::result::{AgeViolation, LicenseValidationResult};
use super::super::rules::RuleBook;

/// Whole years between `birth_date` and `today`, or `None` when the birth date lies in
/// the future.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth_date > today {
        return None;
    }

    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

pub fn validate_age(
    rules: &RuleBook,
    birth_date: NaiveDate,
    request: &CategoryRequest,
    today: NaiveDate,
) -> LicenseValidationResult {
    let age = age_on(birth_date, today);
    let current_age = age.unwrap_or(0);
    let mut violations = Vec::new();

    for category in request.recognized() {
        let required_age = rules.rule(*category).map(|rule| rule.minimum_age);
        let too_young = match (age, required_age) {
            (Some(age), Some(required)) => age < u32::from(required),
            _ => true,
        };
        if too_young {
            violations.push(AgeViolation {
                category: category.code().to_string(),
                required_age,
                current_age,
            });
        }
    }

    for raw in request.unrecognized() {
        violations.push(AgeViolation {
            category: raw.clone(),
            required_age: None,
            current_age,
        });
    }

    if violations.is_empty() {
        return LicenseValidationResult::passed(format!(
            "age requirements met for {} (applicant is {})",
            join_codes(request.recognized()),
            current_age
        ));
    }

    let details = violations
        .iter()
        .map(AgeViolation::describe)
        .collect::<Vec<_>>()
        .join("; ");
    let message = match age {
        Some(_) => format!("age requirements not met: {details}"),
        None => format!("birth date {birth_date} lies after {today}: {details}"),
    };

    LicenseValidationResult::age_failure(message, violations)
}
