use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::eligibility::{
    ActiveLicense, ApplicationIntent, CategoryCode, ExternalLicenseDetails, FixedClock,
    LicenseApplication, LicenseEligibilityEngine, LicenseKind, LicenseRegistry, LicenseStatus,
    PersonId, RegistryError, RuleBook,
};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2024, 6, 15)
}

pub(super) fn rules() -> RuleBook {
    RuleBook::standard()
}

pub(super) fn codes(categories: &[CategoryCode]) -> BTreeSet<CategoryCode> {
    categories.iter().copied().collect()
}

pub(super) fn license(id: &str, categories: &[CategoryCode], expiry: NaiveDate) -> ActiveLicense {
    ActiveLicense {
        license_id: id.to_string(),
        kind: LicenseKind::Full,
        categories: codes(categories),
        issue_date: date(2019, 3, 1),
        expiry_date: expiry,
        status: LicenseStatus::Active,
    }
}

pub(super) fn permit(categories: &[CategoryCode], expiry: NaiveDate) -> ActiveLicense {
    ActiveLicense {
        license_id: "permit-1".to_string(),
        kind: LicenseKind::LearnerPermit,
        categories: codes(categories),
        issue_date: date(2024, 1, 10),
        expiry_date: expiry,
        status: LicenseStatus::Active,
    }
}

pub(super) fn external(
    categories: &[CategoryCode],
    expiry: NaiveDate,
    verified_by_clerk: bool,
) -> ExternalLicenseDetails {
    ExternalLicenseDetails {
        categories: codes(categories),
        expiry_date: expiry,
        verified_by_clerk,
        issuing_authority: Some("Nordland Transport Agency".to_string()),
    }
}

pub(super) fn application(
    intent: ApplicationIntent,
    categories: &[&str],
    birth_date: NaiveDate,
) -> LicenseApplication {
    LicenseApplication {
        intent,
        requested_categories: categories.iter().map(|code| code.to_string()).collect(),
        birth_date,
        person_id: PersonId("person-42".to_string()),
        external_permit: None,
        external_license: None,
    }
}

pub(super) fn adult_birth_date() -> NaiveDate {
    date(1990, 4, 2)
}

#[derive(Default, Clone)]
pub(super) struct StubRegistry {
    pub(super) records: Vec<ActiveLicense>,
}

impl StubRegistry {
    pub(super) fn with(records: Vec<ActiveLicense>) -> Self {
        Self { records }
    }
}

impl LicenseRegistry for StubRegistry {
    async fn licenses_for(&self, _person: &PersonId) -> Result<Vec<ActiveLicense>, RegistryError> {
        Ok(self.records.clone())
    }
}

pub(super) struct OfflineRegistry;

impl LicenseRegistry for OfflineRegistry {
    async fn licenses_for(&self, _person: &PersonId) -> Result<Vec<ActiveLicense>, RegistryError> {
        Err(RegistryError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn engine<R: LicenseRegistry>(registry: R) -> LicenseEligibilityEngine<R, FixedClock> {
    LicenseEligibilityEngine::new(
        Arc::new(rules()),
        Arc::new(registry),
        FixedClock(today()),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
