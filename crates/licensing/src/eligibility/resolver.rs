use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::category::CategoryCode;
use super::domain::{ActiveLicense, PersonId};
use super::rules::RuleBook;
use super::validation::held_categories;

pub const DEFAULT_RENEWAL_WINDOW_MONTHS: u32 = 6;

/// Read access to the authoritative license registry.
pub trait LicenseRegistry: Send + Sync {
    /// Every license and permit record on file for `person`, valid or not.
    fn licenses_for(
        &self,
        person: &PersonId,
    ) -> impl Future<Output = Result<Vec<ActiveLicense>, RegistryError>> + Send;
}

/// Transport-level registry failure.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("license registry unavailable: {0}")]
    Unavailable(String),
    #[error("license registry lookup timed out")]
    Timeout,
}

/// What the orchestrator does when the registry cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryFailurePolicy {
    /// Continue as if the person held nothing.
    #[default]
    FailOpen,
    /// Reject the application until the registry answers.
    FailClosed,
}

impl RegistryFailurePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_open" | "open" => Some(Self::FailOpen),
            "fail_closed" | "closed" => Some(Self::FailClosed),
            _ => None,
        }
    }
}

/// Person's license position as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingLicenseSummary {
    pub active_licenses: Vec<ActiveLicense>,
    pub has_active_licenses: bool,
    pub has_learners_permit: bool,
    pub learners_permit: Option<ActiveLicense>,
    pub held_categories: BTreeSet<CategoryCode>,
    pub can_apply_for: BTreeSet<CategoryCode>,
    pub must_renew: BTreeSet<CategoryCode>,
    pub can_upgrade_to: BTreeSet<CategoryCode>,
    /// Set when the registry lookup failed and this is the safe default, not a fact.
    pub degraded: bool,
}

impl ExistingLicenseSummary {
    pub fn unavailable() -> Self {
        Self {
            active_licenses: Vec::new(),
            has_active_licenses: false,
            has_learners_permit: false,
            learners_permit: None,
            held_categories: BTreeSet::new(),
            can_apply_for: CategoryCode::domain(),
            must_renew: BTreeSet::new(),
            can_upgrade_to: BTreeSet::new(),
            degraded: true,
        }
    }
}

/// Turns registry records into the advisory summary consumed by the orchestrator.
pub struct ExistingLicenseResolver<R> {
    registry: Arc<R>,
    rules: Arc<RuleBook>,
    renewal_window: Months,
}

impl<R> ExistingLicenseResolver<R>
where
    R: LicenseRegistry,
{
    pub fn new(registry: Arc<R>, rules: Arc<RuleBook>) -> Self {
        Self {
            registry,
            rules,
            renewal_window: Months::new(DEFAULT_RENEWAL_WINDOW_MONTHS),
        }
    }

    pub fn with_renewal_window(mut self, months: u32) -> Self {
        self.renewal_window = Months::new(months);
        self
    }

    /// Registry failures degrade to [`ExistingLicenseSummary::unavailable`].
    pub async fn check_existing_licenses(
        &self,
        person: &PersonId,
        today: NaiveDate,
    ) -> ExistingLicenseSummary {
        match self.registry.licenses_for(person).await {
            Ok(records) => {
                debug!(person = %person.0, records = records.len(), "registry lookup complete");
                self.summarize(records, today)
            }
            Err(error) => {
                warn!(person = %person.0, %error, "registry lookup failed, using safe default");
                ExistingLicenseSummary::unavailable()
            }
        }
    }

    pub fn summarize(&self, records: Vec<ActiveLicense>, today: NaiveDate) -> ExistingLicenseSummary {
        let (permits, licenses): (Vec<_>, Vec<_>) = records
            .into_iter()
            .filter(|record| record.is_valid(today))
            .partition(ActiveLicense::is_learner_permit);

        let learners_permit = permits
            .into_iter()
            .max_by_key(|permit| permit.expiry_date);

        let held = held_categories(&licenses, today);
        let can_apply_for = CategoryCode::domain()
            .difference(&held)
            .copied()
            .collect();
        let must_renew = licenses
            .iter()
            .filter(|license| self.within_renewal_window(license, today))
            .flat_map(|license| license.categories.iter().copied())
            .collect();
        let can_upgrade_to = self.rules.upgrades_from(&held);

        ExistingLicenseSummary {
            has_active_licenses: !licenses.is_empty(),
            active_licenses: licenses,
            has_learners_permit: learners_permit.is_some(),
            learners_permit,
            held_categories: held,
            can_apply_for,
            must_renew,
            can_upgrade_to,
            degraded: false,
        }
    }

    fn within_renewal_window(&self, license: &ActiveLicense, today: NaiveDate) -> bool {
        license
            .expiry_date
            .checked_sub_months(self.renewal_window)
            .map_or(true, |opens| today >= opens)
    }
}
