//! Liveness and readiness probes.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "accounts-backoffice",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// The service holds no connections of its own, so readiness is liveness.
pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}
