/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// {
///   "status": 200,
///   "code": 20000,
///   "data": { "status": "healthy", "version": "0.1.0", "database": "connected", "latency_ms": 1 },
///   "message": "Service is running."
/// }
/// ```

use super::{ok, Envelope};
use crate::app::AppState;
use axum::extract::State;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,

    /// `connected`, `disconnected`, or `none` without a database
    pub database: String,

    /// Database round trip, when one was measured
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

pub async fn health_check(State(state): State<AppState>) -> Envelope<HealthResponse> {
    let (database, latency_ms) = match &state.db {
        Some(pool) => match clubhouse_shared::db::pool::health_check(pool).await {
            Ok(latency) => ("connected", Some(latency.as_millis() as u64)),
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                ("disconnected", None)
            }
        },
        None => ("none", None),
    };

    ok(
        HealthResponse {
            status: if database == "disconnected" {
                "degraded".to_string()
            } else {
                "healthy".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
            latency_ms,
        },
        "Service is running.",
    )
}
