use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::super::category::{join_codes, CategoryCode};
use super::super::domain::{ActiveLicense, ExternalLicenseDetails};
use super::super::result::LicenseValidationResult;
use super::super::rules::{LearnerPermitScope, RuleBook};

/// Why a permit source could not be used.
enum PermitGap {
    NeverHeld,
    Expired(NaiveDate),
    Unverified,
}

pub fn validate_learner_permit(
    rules: &RuleBook,
    requested: &BTreeSet<CategoryCode>,
    existing_permit: Option<&ActiveLicense>,
    external_permit: Option<&ExternalLicenseDetails>,
    today: NaiveDate,
) -> LicenseValidationResult {
    let needing: Vec<(CategoryCode, LearnerPermitScope)> = requested
        .iter()
        .filter_map(|category| {
            rules
                .rule(*category)
                .filter(|rule| rule.participates_in_learner_group())
                .map(|rule| (*category, rule.learner_permit))
        })
        .collect();

    if needing.is_empty() {
        return LicenseValidationResult::passed("no learner's permit required");
    }

    let shared_group: BTreeSet<CategoryCode> = rules
        .rules()
        .filter(|(_, rule)| rule.learner_permit == LearnerPermitScope::SharedGroup)
        .map(|(category, _)| category)
        .collect();

    let covers = |permit: &BTreeSet<CategoryCode>,
                  category: CategoryCode,
                  scope: LearnerPermitScope| match scope {
        LearnerPermitScope::SharedGroup => !permit.is_disjoint(&shared_group),
        LearnerPermitScope::ExactCategory => permit.contains(&category),
        LearnerPermitScope::NotRequired => true,
    };

    let mut gap = PermitGap::NeverHeld;
    let mut unsatisfied = needing.clone();

    if let Some(permit) = existing_permit {
        if permit.is_valid(today) {
            unsatisfied.retain(|(category, scope)| !covers(&permit.categories, *category, *scope));
        } else if permit.expiry_date < today {
            gap = PermitGap::Expired(permit.expiry_date);
        }
    }

    if !unsatisfied.is_empty() {
        if let Some(external) = external_permit {
            if !external.verified_by_clerk {
                gap = PermitGap::Unverified;
            } else if external.is_expired(today) {
                gap = PermitGap::Expired(external.expiry_date);
            } else {
                unsatisfied
                    .retain(|(category, scope)| !covers(&external.categories, *category, *scope));
            }
        }
    }

    if unsatisfied.is_empty() {
        return LicenseValidationResult::passed(format!(
            "learner's permit covers {}",
            join_codes(needing.iter().map(|(category, _)| category))
        ));
    }

    let missing: BTreeSet<CategoryCode> =
        unsatisfied.iter().map(|(category, _)| *category).collect();
    let categories = join_codes(&missing);
    let message = match gap {
        PermitGap::Expired(expired_on) => format!(
            "learner's permit expired on {expired_on}; a valid permit is required for {categories}"
        ),
        PermitGap::Unverified => format!(
            "external learner's permit has not been verified by a clerk; a valid permit is required for {categories}"
        ),
        PermitGap::NeverHeld => {
            format!("no valid learner's permit held for {categories}")
        }
    };

    LicenseValidationResult::learner_permit_failure(message, missing)
}
