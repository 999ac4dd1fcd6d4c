//! Health check endpoints.

use axum::{extract::State, Json};
use riskops_storage::StorageAdapter;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // A panicked probe counts as unhealthy storage
    let ok = state
        .run(|engine| Ok(engine.storage().is_healthy()))
        .await
        .unwrap_or(false);

    Json(HealthResponse {
        status: if ok { "ok" } else { "degraded" }.to_string(),
        storage: state.engine.storage().backend_name().to_string(),
        storage_ok: ok,
        version: env!("CARGO_PKG_VERSION").to_string(),
        time_utc: chrono::Utc::now(),
    })
}
