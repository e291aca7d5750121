use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::super::category::{join_codes, CategoryCode};
use super::super::domain::ActiveLicense;
use super::super::result::LicenseValidationResult;
use super::super::rules::{Prerequisite, RuleBook};

/// Union of the categories on every license valid at `today`.
pub fn held_categories(licenses: &[ActiveLicense], today: NaiveDate) -> BTreeSet<CategoryCode> {
    licenses
        .iter()
        .filter(|license| license.is_valid(today))
        .flat_map(|license| license.categories.iter().copied())
        .collect()
}

pub fn validate_combinations(
    rules: &RuleBook,
    requested: &BTreeSet<CategoryCode>,
    existing_licenses: &[ActiveLicense],
    today: NaiveDate,
) -> LicenseValidationResult {
    let mut available = held_categories(existing_licenses, today);
    available.extend(requested.iter().copied());

    let mut missing = BTreeSet::new();
    let mut problems = Vec::new();

    for category in requested {
        let Some(rule) = rules.rule(*category) else {
            continue;
        };
        if rule.prerequisite.is_satisfied_by(&available) {
            continue;
        }

        if let Some(fix) = rule.prerequisite.suggested_fix() {
            missing.insert(fix);
        }
        problems.push(match &rule.prerequisite {
            Prerequisite::AnyOf(bases) => format!(
                "{category} requires one of {} to be held or requested",
                join_codes(bases)
            ),
            other => format!(
                "{category} requires {} to be held or requested",
                join_codes(&other.categories())
            ),
        });
    }

    let mut invalid_combinations = Vec::new();
    if !rules.whitelist().permits(requested) {
        let combination = join_codes(requested);
        problems.push(format!("{combination} may not be requested together"));
        invalid_combinations.push(combination);
    }

    if problems.is_empty() {
        return LicenseValidationResult::passed(format!(
            "prerequisites and combination valid for {}",
            join_codes(requested)
        ));
    }

    LicenseValidationResult::combination_failure(
        format!("combination check failed: {}", problems.join("; ")),
        missing,
        invalid_combinations,
    )
}
