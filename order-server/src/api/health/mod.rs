//! Health check routes
//!
//! # Routes
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /health | GET | liveness |
//! | /health/detailed | GET | component checks |
//!
//! # Example
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "service": "order-server",
//!   "version": "0.1.0",
//!   "environment": "development"
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::SystemTime;

use crate::core::ServerState;
use crate::db::DocReader;
use crate::db::SEQUENCES_TABLE;
use shared::models::Sequence;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    environment: String,
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    fn ok_with_latency(latency_ms: u64) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }
}

static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    START_TIME.get_or_init(SystemTime::now);
    Json(HealthResponse {
        status: "healthy",
        service: "order-server",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}

pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    // A read snapshot plus one table scan exercises the file end to end
    let db_start = std::time::Instant::now();
    let db_check = match state
        .store
        .begin_read()
        .and_then(|txn| txn.scan_docs::<Sequence>(SEQUENCES_TABLE))
    {
        Ok(_) => CheckResult::ok_with_latency(db_start.elapsed().as_millis() as u64),
        Err(e) => CheckResult::error(format!("Database error: {}", e)),
    };

    let all_ok = db_check.status == "ok";

    Json(DetailedHealthResponse {
        status: if all_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: get_uptime_seconds(),
        checks: HealthChecks { database: db_check },
    })
}
