//! Health check endpoints: liveness, readiness and the plain `/health`.

use chrono::{DateTime, Utc};
use http::StatusCode;
use routekit::{Context, HttpError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    timestamp: DateTime<Utc>,
    version: String,
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    status: String,
    timestamp: DateTime<Utc>,
    checks: Vec<Check>,
}

#[derive(Debug, Serialize)]
struct Check {
    name: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn ok_response() -> HealthResponse {
    HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// GET /health
pub async fn health(ctx: Context) -> Result<(), HttpError> {
    ctx.json(StatusCode::OK, &ok_response())
}

/// GET /health/live
pub async fn live(ctx: Context) -> Result<(), HttpError> {
    ctx.json(StatusCode::OK, &ok_response())
}

/// GET /health/ready
///
/// The store is in-memory, so readiness has no external dependency to
/// probe; the check list keeps the response shape ready for one.
pub async fn ready(ctx: Context) -> Result<(), HttpError> {
    let checks = vec![
        Check {
            name: "application".to_string(),
            status: "ok".to_string(),
            error: None,
        },
        Check {
            name: "memory".to_string(),
            status: "ok".to_string(),
            error: None,
        },
    ];

    let all_ok = checks.iter().all(|check| check.status == "ok");
    let (status, http_status) = if all_ok {
        ("ok", StatusCode::OK)
    } else {
        ("error", StatusCode::SERVICE_UNAVAILABLE)
    };

    ctx.json(
        http_status,
        &ReadinessResponse {
            status: status.to_string(),
            timestamp: Utc::now(),
            checks,
        },
    )
}
