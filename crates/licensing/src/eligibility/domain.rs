use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::CategoryCode;

/// Identifier for a license holder in the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub String);

/// Distinguishes full licenses from learner's permits in registry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseKind {
    Full,
    LearnerPermit,
}

/// Administrative state of a registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    Suspended,
    Revoked,
}

/// License or permit record as returned by the license registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLicense {
    pub license_id: String,
    pub kind: LicenseKind,
    pub categories: BTreeSet<CategoryCode>,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: LicenseStatus,
}

impl ActiveLicense {
    /// Derived on every call so the answer follows the supplied date.
    pub fn is_valid(&self, today: NaiveDate) -> bool {
        self.status == LicenseStatus::Active
            && self.issue_date <= today
            && self.expiry_date >= today
    }

    pub fn is_learner_permit(&self) -> bool {
        self.kind == LicenseKind::LearnerPermit
    }
}

/// Clerk-attested license or permit held outside the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLicenseDetails {
    pub categories: BTreeSet<CategoryCode>,
    pub expiry_date: NaiveDate,
    pub verified_by_clerk: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,
}

impl ExternalLicenseDetails {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    pub fn is_usable(&self, today: NaiveDate) -> bool {
        self.verified_by_clerk && !self.is_expired(today)
    }

    /// Registry-shaped view of a usable external license, for prerequisite checks.
    pub fn as_prior_license(&self, today: NaiveDate) -> Option<ActiveLicense> {
        self.is_usable(today).then(|| ActiveLicense {
            license_id: "external".to_string(),
            kind: LicenseKind::Full,
            categories: self.categories.clone(),
            issue_date: today,
            expiry_date: self.expiry_date,
            status: LicenseStatus::Active,
        })
    }
}

/// Purpose of a submission, which decides the checks that apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationIntent {
    NewLicense,
    LearnersPermit,
    Renewal,
    Upgrade,
}

impl ApplicationIntent {
    pub fn label(self) -> &'static str {
        match self {
            ApplicationIntent::NewLicense => "NEW_LICENSE",
            ApplicationIntent::LearnersPermit => "LEARNERS_PERMIT",
            ApplicationIntent::Renewal => "RENEWAL",
            ApplicationIntent::Upgrade => "UPGRADE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "NEW_LICENSE" | "NEW" => Some(Self::NewLicense),
            "LEARNERS_PERMIT" | "LEARNER" => Some(Self::LearnersPermit),
            "RENEWAL" | "RENEW" => Some(Self::Renewal),
            "UPGRADE" => Some(Self::Upgrade),
            _ => None,
        }
    }

    /// Intents that must not re-issue a category the person already holds.
    pub fn blocks_duplicates(self) -> bool {
        matches!(self, Self::NewLicense | Self::LearnersPermit)
    }
}

/// Inbound application evaluated by the eligibility engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseApplication {
    pub intent: ApplicationIntent,
    /// Raw category codes as entered; unknown codes are rejected, not dropped.
    pub requested_categories: Vec<String>,
    pub birth_date: NaiveDate,
    pub person_id: PersonId,
    #[serde(default)]
    pub external_permit: Option<ExternalLicenseDetails>,
    #[serde(default)]
    pub external_license: Option<ExternalLicenseDetails>,
}
