//! Health checks
//!
//! Liveness is unconditional; readiness pings the database and reports the
//! pool's connection counters when one is attached.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use wo_db::Database;

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Database component of the health report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: HealthStatus,
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// Overall health report
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// State for the health endpoints
pub struct HealthState {
    start_time: Instant,
    db: Option<Database>,
}

impl HealthState {
    pub fn new(db: Option<Database>) -> Self {
        Self {
            start_time: Instant::now(),
            db,
        }
    }

    pub async fn check(&self) -> HealthReport {
        let database = match &self.db {
            Some(db) => {
                let status = match db.ping().await {
                    Ok(()) => HealthStatus::Healthy,
                    Err(e) => {
                        tracing::warn!(error = %e, "database health check failed");
                        HealthStatus::Unhealthy
                    }
                };
                let stats = db.stats();
                Some(DatabaseHealth {
                    status,
                    pool_size: stats.size,
                    idle_connections: stats.idle,
                })
            }
            None => None,
        };

        let status = match &database {
            Some(db) if db.status == HealthStatus::Unhealthy => HealthStatus::Unhealthy,
            _ => HealthStatus::Healthy,
        };

        HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            database,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Simple liveness check
pub async fn liveness() -> &'static str {
    "OK"
}

/// Readiness check: pings the database when configured
pub async fn readiness(State(state): State<Arc<HealthState>>) -> (StatusCode, Json<HealthReport>) {
    let report = state.check().await;
    let status = report.http_status();
    (status, Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_without_database() {
        let state = HealthState::new(None);
        let report = state.check().await;

        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.database.is_none());
        assert_eq!(report.http_status(), StatusCode::OK);
    }
}
