//! End-to-end scenarios driven through the public engine facade and a JSON registry
//! snapshot, without reaching into private modules.

use std::io::Cursor;
use std::sync::Arc;

use chrono::NaiveDate;
use licensing::eligibility::{
    ActiveLicense, ApplicationIntent, CategoryCode, ExternalLicenseDetails, FixedClock,
    InMemoryLicenseRegistry, LicenseApplication, LicenseEligibilityEngine, LicenseKind,
    LicenseStatus, PersonId, RuleBook,
};

const SNAPSHOT: &str = r#"{
    "p-100": [
        {
            "license_id": "lic-100",
            "kind": "full",
            "categories": ["B"],
            "issue_date": "2015-05-01",
            "expiry_date": "2024-10-01",
            "status": "active"
        },
        {
            "license_id": "lic-101",
            "kind": "full",
            "categories": ["A"],
            "issue_date": "2012-02-01",
            "expiry_date": "2022-02-01",
            "status": "active"
        }
    ],
    "p-200": [
        {
            "license_id": "permit-200",
            "kind": "learner_permit",
            "categories": ["A1"],
            "issue_date": "2024-03-01",
            "expiry_date": "2025-03-01",
            "status": "active"
        }
    ]
}"#;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn engine() -> LicenseEligibilityEngine<InMemoryLicenseRegistry, FixedClock> {
    let registry = InMemoryLicenseRegistry::from_reader(Cursor::new(SNAPSHOT))
        .expect("snapshot parses");
    LicenseEligibilityEngine::new(
        Arc::new(RuleBook::standard()),
        Arc::new(registry),
        FixedClock(date(2024, 6, 15)),
    )
}

fn application(person: &str, intent: ApplicationIntent, categories: &[&str]) -> LicenseApplication {
    LicenseApplication {
        intent,
        requested_categories: categories.iter().map(|code| code.to_string()).collect(),
        birth_date: date(1988, 9, 30),
        person_id: PersonId(person.to_string()),
        external_permit: None,
        external_license: None,
    }
}

#[tokio::test]
async fn summary_marks_expiring_license_for_renewal() {
    let engine = engine();

    let summary = engine.summary(&PersonId("p-100".to_string())).await;

    assert!(!summary.degraded);
    assert_eq!(summary.held_categories.len(), 1);
    assert!(summary.must_renew.contains(&CategoryCode::B));
    assert!(summary.can_apply_for.contains(&CategoryCode::A));
    assert!(summary.can_upgrade_to.contains(&CategoryCode::BE));
}

#[tokio::test]
async fn holder_upgrades_to_trailer_combination() {
    let engine = engine();

    let result = engine
        .validate_application(&application("p-100", ApplicationIntent::Upgrade, &["BE"]))
        .await;

    assert!(result.is_valid(), "{}", result.message());
}

#[tokio::test]
async fn expired_motorcycle_license_can_be_reissued_as_new() {
    let engine = engine();
    let mut request = application("p-100", ApplicationIntent::NewLicense, &["A"]);
    request.external_permit = Some(ExternalLicenseDetails {
        categories: [CategoryCode::A].into_iter().collect(),
        expiry_date: date(2024, 12, 1),
        verified_by_clerk: true,
        issuing_authority: None,
    });

    let result = engine.validate_application(&request).await;

    assert!(result.is_valid(), "{}", result.message());
}

#[tokio::test]
async fn permit_holder_gets_light_vehicle_through_shared_group() {
    let engine = engine();

    let result = engine
        .validate_application(&application("p-200", ApplicationIntent::NewLicense, &["B"]))
        .await;

    assert!(result.is_valid(), "{}", result.message());
}

#[tokio::test]
async fn unknown_person_has_no_history() {
    let engine = engine();

    let result = engine
        .validate_application(&application("p-999", ApplicationIntent::NewLicense, &["B"]))
        .await;

    assert!(!result.is_valid());
    assert!(result.missing_prerequisites().contains(&CategoryCode::B));
}

#[tokio::test]
async fn inserted_records_are_visible_to_later_lookups() {
    let registry = Arc::new(InMemoryLicenseRegistry::default());
    let engine = LicenseEligibilityEngine::new(
        Arc::new(RuleBook::standard()),
        registry.clone(),
        FixedClock(date(2024, 6, 15)),
    );
    registry.insert(
        PersonId("p-300".to_string()),
        ActiveLicense {
            license_id: "lic-300".to_string(),
            kind: LicenseKind::Full,
            categories: [CategoryCode::B].into_iter().collect(),
            issue_date: date(2020, 1, 1),
            expiry_date: date(2030, 1, 1),
            status: LicenseStatus::Active,
        },
    );

    let result = engine
        .validate_application(&application(
            "p-300",
            ApplicationIntent::LearnersPermit,
            &["B"],
        ))
        .await;

    assert!(!result.is_valid());
    assert_eq!(result.invalid_combinations().to_vec(), vec!["B".to_string()]);
    assert_eq!(registry.people(), 1);
}

#[test]
fn malformed_snapshot_is_reported() {
    let error = InMemoryLicenseRegistry::from_reader(Cursor::new("{\"p-1\": 3}"))
        .expect_err("invalid snapshot");
    assert!(error.to_string().contains("not valid JSON"));
}
