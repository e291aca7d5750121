use chrono::NaiveDate;
use licensing::eligibility::InMemoryLicenseRegistry;
use licensing::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Empty registry unless a snapshot path is given.
pub(crate) fn load_registry(path: Option<&Path>) -> Result<InMemoryLicenseRegistry, AppError> {
    match path {
        Some(path) => {
            let registry = InMemoryLicenseRegistry::from_path(path)?;
            info!(path = %path.display(), people = registry.people(), "registry snapshot loaded");
            Ok(registry)
        }
        None => Ok(InMemoryLicenseRegistry::default()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
