//! Work order log repository
//!
//! Append-only: logs are created and listed, never updated. Individual
//! deletion is not exposed; rows disappear through the work-order cascade.

use sqlx::PgPool;
use wo_core::traits::Id;
use wo_models::WorkOrderLog;

use crate::repository::RepositoryResult;

/// Work order log repository implementation
pub struct WorkOrderLogRepository {
    pool: PgPool,
}

impl WorkOrderLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the log entries of a work order, oldest first
    pub async fn list_by_work_order(
        &self,
        work_order_id: Id,
    ) -> RepositoryResult<Vec<WorkOrderLog>> {
        let rows = sqlx::query_as::<_, WorkOrderLog>(
            r#"
            SELECT id, work_order_id, message, created_at
            FROM work_order_logs
            WHERE work_order_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(work_order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Append a log entry
    pub async fn append(
        &self,
        work_order_id: Id,
        message: &str,
    ) -> RepositoryResult<WorkOrderLog> {
        let row = sqlx::query_as::<_, WorkOrderLog>(
            r#"
            INSERT INTO work_order_logs (work_order_id, message, created_at)
            VALUES ($1, $2, NOW())
            RETURNING id, work_order_id, message, created_at
            "#,
        )
        .bind(work_order_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
