//! Liveness handler.
//!
//! - GET /healthz -> `{status, authMode, bucket}`

use crate::{models::auth::AuthMode, state::AppState};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

/// `GET /healthz`
///
/// Cheap liveness check; never touches the object store.
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
            auth_mode: state.auth_mode,
            bucket: state.storage.bucket().to_string(),
        }),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    auth_mode: AuthMode,
    bucket: String,
}
