use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use licensing::eligibility::{
    eligibility_router, CategoryCode, Clock, LearnerPermitScope, LicenseEligibilityEngine,
    LicenseRegistry, Prerequisite, RuleBook,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RuleView {
    pub(crate) category: CategoryCode,
    pub(crate) label: &'static str,
    pub(crate) minimum_age: u8,
    pub(crate) prerequisite: Prerequisite,
    pub(crate) learner_permit: LearnerPermitScope,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RuleBookResponse {
    pub(crate) rules: Vec<RuleView>,
    pub(crate) combinations: Vec<BTreeSet<CategoryCode>>,
}

impl From<&RuleBook> for RuleBookResponse {
    fn from(book: &RuleBook) -> Self {
        let rules = book
            .rules()
            .map(|(category, rule)| RuleView {
                category,
                label: category.label(),
                minimum_age: rule.minimum_age,
                prerequisite: rule.prerequisite.clone(),
                learner_permit: rule.learner_permit,
            })
            .collect();

        Self {
            rules,
            combinations: book.whitelist().entries().to_vec(),
        }
    }
}

pub(crate) fn with_eligibility_routes<R, C>(
    engine: Arc<LicenseEligibilityEngine<R, C>>,
) -> axum::Router
where
    R: LicenseRegistry + 'static,
    C: Clock + 'static,
{
    let rule_book = RuleBookResponse::from(engine.rules());

    eligibility_router(engine)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/licenses/rules",
            axum::routing::get(move || rules_endpoint(rule_book.clone())),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn rules_endpoint(rule_book: RuleBookResponse) -> Json<RuleBookResponse> {
    Json(rule_book)
}
