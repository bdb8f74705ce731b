/// Health check API route
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

/// GET /api/health - Health check endpoint
///
/// Answers 503 when the database cannot be reached.
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = sqlx::query("SELECT 1")
        .execute(&app_state.pool)
        .await
        .map_err(|e| tracing::error!(error = %e, "Health check query failed"))
        .is_ok();

    let (status, health, database) = if database_ok {
        (StatusCode::OK, "ok", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        status,
        Json(HealthResponse {
            status: health,
            database,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
