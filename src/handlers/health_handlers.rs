//! Liveness and readiness probes.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use sqlx::SqlitePool;

/// Tables the service cannot run without.
const REQUIRED_TABLES: [&str; 2] = ["species", "sessions"];

/// `GET /healthz`. No I/O.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /readyz`
///
/// Ready once the database answers and the schema is migrated. Lists any
/// missing table; 503 until it is empty.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match missing_tables(&state.species.db).await {
        Ok(missing) if missing.is_empty() => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "tables": REQUIRED_TABLES })),
        ),
        Ok(missing) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "missing_tables": missing })),
        ),
        Err(err) => {
            tracing::warn!("readiness check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "error": err.to_string() })),
            )
        }
    }
}

async fn missing_tables(db: &SqlitePool) -> Result<Vec<&'static str>, sqlx::Error> {
    let present: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(db)
            .await?;
    Ok(REQUIRED_TABLES
        .into_iter()
        .filter(|table| !present.iter().any(|name| name == table))
        .collect())
}
