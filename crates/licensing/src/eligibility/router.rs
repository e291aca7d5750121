use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use super::clock::Clock;
use super::domain::{LicenseApplication, PersonId};
use super::engine::LicenseEligibilityEngine;
use super::resolver::LicenseRegistry;

/// Router exposing application validation and the existing-license summary.
pub fn eligibility_router<R, C>(engine: Arc<LicenseEligibilityEngine<R, C>>) -> Router
where
    R: LicenseRegistry + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/api/v1/licenses/validate", post(validate_handler::<R, C>))
        .route(
            "/api/v1/licenses/:person_id/summary",
            get(summary_handler::<R, C>),
        )
        .with_state(engine)
}

/// Validation failures are part of the payload, so this always answers `200 OK`.
pub(crate) async fn validate_handler<R, C>(
    State(engine): State<Arc<LicenseEligibilityEngine<R, C>>>,
    axum::Json(application): axum::Json<LicenseApplication>,
) -> Response
where
    R: LicenseRegistry + 'static,
    C: Clock + 'static,
{
    let result = engine.validate_application(&application).await;
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn summary_handler<R, C>(
    State(engine): State<Arc<LicenseEligibilityEngine<R, C>>>,
    Path(person_id): Path<String>,
) -> Response
where
    R: LicenseRegistry + 'static,
    C: Clock + 'static,
{
    let summary = engine.summary(&PersonId(person_id)).await;
    (StatusCode::OK, axum::Json(summary)).into_response()
}
