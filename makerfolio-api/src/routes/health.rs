/// Liveness endpoint
///
/// `GET /health` answers 200 as long as the process is up. The body reports
/// whether the database pool can still reach PostgreSQL, so a load balancer
/// can tell "up" apart from "up but degraded":
///
/// ```json
/// { "status": "healthy", "version": "0.1.0", "database": "connected" }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use makerfolio_shared::db::pool;
use serde::{Deserialize, Serialize};

/// Health report body
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Reports process liveness and database reachability
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database_up = pool::health_check(&state.db).await.is_ok();

    let (status, database) = if database_up {
        ("healthy", "connected")
    } else {
        ("degraded", "disconnected")
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
