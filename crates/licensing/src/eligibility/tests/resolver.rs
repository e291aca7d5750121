use std::sync::Arc;

use super::common::*;
use crate::eligibility::CategoryCode::{self, A, B, BE, C, C1, D};
use crate::eligibility::{
    ExistingLicenseResolver, ExistingLicenseSummary, LicenseStatus, PersonId,
};

fn resolver<R: crate::eligibility::LicenseRegistry>(registry: R) -> ExistingLicenseResolver<R> {
    ExistingLicenseResolver::new(Arc::new(registry), Arc::new(rules()))
}

fn person() -> PersonId {
    PersonId("person-42".to_string())
}

#[tokio::test]
async fn summary_reflects_valid_records_only() {
    let mut suspended = license("lic-3", &[C], date(2030, 1, 1));
    suspended.status = LicenseStatus::Suspended;
    let registry = StubRegistry::with(vec![
        license("lic-1", &[B], date(2024, 11, 30)),
        license("lic-2", &[A], date(2031, 5, 1)),
        suspended,
        permit(&[A], date(2024, 9, 1)),
    ]);

    let summary = resolver(registry)
        .check_existing_licenses(&person(), today())
        .await;

    assert!(!summary.degraded);
    assert!(summary.has_active_licenses);
    assert_eq!(summary.active_licenses.len(), 2);
    assert_eq!(summary.held_categories, codes(&[A, B]));
    assert_eq!(
        summary.can_apply_for,
        codes(&[CategoryCode::A1, C1, C, D, BE])
    );
    assert_eq!(summary.must_renew, codes(&[B]));
    assert_eq!(summary.can_upgrade_to, codes(&[C1, C, D, BE]));
    assert!(summary.has_learners_permit);
    assert_eq!(
        summary.learners_permit.map(|permit| permit.expiry_date),
        Some(date(2024, 9, 1))
    );
}

#[tokio::test]
async fn renewal_window_boundary_is_inclusive() {
    let registry = StubRegistry::with(vec![
        license("lic-1", &[B], date(2024, 12, 15)),
        license("lic-2", &[A], date(2024, 12, 16)),
    ]);

    let summary = resolver(registry)
        .check_existing_licenses(&person(), today())
        .await;

    assert_eq!(summary.must_renew, codes(&[B]));
}

#[tokio::test]
async fn renewal_window_is_configurable() {
    let registry = StubRegistry::with(vec![license("lic-1", &[B], date(2024, 11, 30))]);

    let summary = resolver(registry)
        .with_renewal_window(3)
        .check_existing_licenses(&person(), today())
        .await;

    assert!(summary.must_renew.is_empty());
}

#[tokio::test]
async fn latest_expiring_permit_is_selected() {
    let mut later = permit(&[B], date(2025, 3, 1));
    later.license_id = "permit-2".to_string();
    let registry = StubRegistry::with(vec![permit(&[A], date(2024, 9, 1)), later]);

    let summary = resolver(registry)
        .check_existing_licenses(&person(), today())
        .await;

    assert!(!summary.has_active_licenses);
    assert_eq!(
        summary.learners_permit.map(|permit| permit.license_id),
        Some("permit-2".to_string())
    );
    assert_eq!(summary.can_apply_for, CategoryCode::domain());
}

#[tokio::test]
async fn registry_outage_returns_safe_default() {
    let summary = resolver(OfflineRegistry)
        .check_existing_licenses(&person(), today())
        .await;

    assert_eq!(summary, ExistingLicenseSummary::unavailable());
    assert!(summary.degraded);
    assert!(!summary.has_active_licenses);
    assert_eq!(summary.can_apply_for, CategoryCode::domain());
}
