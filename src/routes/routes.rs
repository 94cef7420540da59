//! Defines routes for object operations.
//!
//! ## Structure
//! - `GET    /healthz`          — liveness, reports the resolved auth mode
//! - `PUT    /object/{*path}`   — upload object
//! - `GET    /object/{*path}`   — download (`?download=proxy|url|redirect`)
//! - `HEAD   /object/{*path}`   — retrieve metadata only
//! - `DELETE /object/{*path}`   — delete object or one version (`?versionId=`)
//! - `GET    /version/{*path}`  — list versions under the path
//! - `GET|HEAD|DELETE /presigned/{bucket}/{*key}` — execute a presigned link
//!
//! The wildcard `*path` allows nested keys like `photos/2025/img.jpg`.

use crate::{
    handlers::{
        health_handlers::healthz,
        object_handlers::{
            delete_object, get_object, head_object, list_versions, presigned_request,
            upload_object,
        },
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, put},
};

/// Build and return the router for all object routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/object/{*path}",
            put(upload_object)
                .get(get_object)
                .head(head_object)
                .delete(delete_object),
        )
        .route("/version/{*path}", get(list_versions))
        .route(
            "/presigned/{bucket}/{*key}",
            get(presigned_request)
                .head(presigned_request)
                .delete(presigned_request),
        )
}
