use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::category::{join_codes, CategoryCode, CategoryRequest};
use super::clock::Clock;
use super::domain::{ApplicationIntent, LicenseApplication, PersonId};
use super::resolver::{
    ExistingLicenseResolver, ExistingLicenseSummary, LicenseRegistry, RegistryFailurePolicy,
};
use super::result::LicenseValidationResult;
use super::rules::RuleBook;
use super::validation::{validate_age, validate_combinations, validate_learner_permit};

/// Sequences the eligibility checks for one application.
pub struct LicenseEligibilityEngine<R, C> {
    rules: Arc<RuleBook>,
    resolver: ExistingLicenseResolver<R>,
    clock: C,
    failure_policy: RegistryFailurePolicy,
}

impl<R, C> LicenseEligibilityEngine<R, C>
where
    R: LicenseRegistry,
    C: Clock,
{
    pub fn new(rules: Arc<RuleBook>, registry: Arc<R>, clock: C) -> Self {
        let resolver = ExistingLicenseResolver::new(registry, rules.clone());
        Self {
            rules,
            resolver,
            clock,
            failure_policy: RegistryFailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: RegistryFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_renewal_window(mut self, months: u32) -> Self {
        self.resolver = self.resolver.with_renewal_window(months);
        self
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub async fn summary(&self, person: &PersonId) -> ExistingLicenseSummary {
        self.resolver
            .check_existing_licenses(person, self.clock.today())
            .await
    }

    /// Run every applicable check and return the first failure, or success.
    pub async fn validate_application(
        &self,
        application: &LicenseApplication,
    ) -> LicenseValidationResult {
        let result = self.evaluate(application).await;
        info!(
            person = %application.person_id.0,
            intent = application.intent.label(),
            valid = result.is_valid(),
            "license application evaluated"
        );
        result
    }

    async fn evaluate(&self, application: &LicenseApplication) -> LicenseValidationResult {
        let today = self.clock.today();
        let request = CategoryRequest::parse(&application.requested_categories);
        if request.is_empty() {
            return LicenseValidationResult::rejected(
                "at least one license category must be requested",
            );
        }

        let existing = self
            .resolver
            .check_existing_licenses(&application.person_id, today)
            .await;
        if existing.degraded && self.failure_policy == RegistryFailurePolicy::FailClosed {
            return LicenseValidationResult::rejected(
                "license registry is unavailable; existing licenses could not be confirmed, retry once the registry is reachable",
            );
        }

        let age = validate_age(&self.rules, application.birth_date, &request, today);
        debug!(valid = age.is_valid(), "age check");
        if !age.is_valid() {
            return age;
        }

        let requested = request.recognized();
        let mut prior = existing.active_licenses.clone();
        if let Some(external) = &application.external_license {
            prior.extend(external.as_prior_license(today));
        }
        let combinations = validate_combinations(&self.rules, requested, &prior, today);
        debug!(valid = combinations.is_valid(), "combination check");
        if !combinations.is_valid() {
            return combinations;
        }

        if application.intent == ApplicationIntent::NewLicense {
            let permit = validate_learner_permit(
                &self.rules,
                requested,
                existing.learners_permit.as_ref(),
                application.external_permit.as_ref(),
                today,
            );
            debug!(valid = permit.is_valid(), "learner's permit check");
            if !permit.is_valid() {
                return permit;
            }
        }

        if application.intent.blocks_duplicates() {
            let duplicates: BTreeSet<CategoryCode> = requested
                .intersection(&existing.held_categories)
                .copied()
                .collect();
            if !duplicates.is_empty() {
                return LicenseValidationResult::duplicate_failure(
                    format!(
                        "categories already held: {}; submit a RENEWAL or UPGRADE application instead",
                        join_codes(&duplicates)
                    ),
                    &duplicates,
                );
            }
        }

        LicenseValidationResult::passed(format!(
            "{} application for {} is admissible",
            application.intent.label(),
            join_codes(requested)
        ))
    }
}
