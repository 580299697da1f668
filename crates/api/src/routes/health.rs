use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the stored shape kinds match the ones this build knows.
    pub registry_in_sync: bool,
}

/// GET /health -- returns service, database and shape registry health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = uptemplate_db::health_check(&state.pool).await.is_ok();
    let registry_in_sync = match uptemplate_db::registry_in_sync(&state.pool).await {
        Ok(in_sync) => in_sync,
        Err(e) => {
            tracing::warn!(error = %e, "Shape kind lookup failed");
            false
        }
    };
    if db_healthy && !registry_in_sync {
        tracing::warn!("shape_kinds rows differ from the kind registry");
    }

    let status = if db_healthy && registry_in_sync { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        registry_in_sync,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
