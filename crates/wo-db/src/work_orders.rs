//! Work order repository
//!
//! List queries order by import position first so bulk-imported batches
//! come back in spreadsheet order, then by id for everything created by
//! hand. No optimistic-concurrency column: last write wins.

use async_trait::async_trait;
use sqlx::PgPool;
use wo_core::traits::Id;
use wo_models::{WorkOrder, WorkOrderStatus, WorkOrderSummary};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

/// DTO for creating a work order
#[derive(Debug, Clone)]
pub struct CreateWorkOrderDto {
    pub package_id: Id,
    pub sub_package_id: Option<Id>,
    pub title: String,
    pub task: Option<String>,
    pub status: WorkOrderStatus,
    pub progress: i32,
    pub office: Option<String>,
    pub os_number: Option<String>,
    pub tag: Option<String>,
    pub machine_name: Option<String>,
    pub responsible: Option<String>,
    pub source_row: Option<i32>,
    pub import_order: Option<i32>,
}

impl CreateWorkOrderDto {
    pub fn new(package_id: Id, title: impl Into<String>) -> Self {
        Self {
            package_id,
            sub_package_id: None,
            title: title.into(),
            task: None,
            status: WorkOrderStatus::Pending,
            progress: 0,
            office: None,
            os_number: None,
            tag: None,
            machine_name: None,
            responsible: None,
            source_row: None,
            import_order: None,
        }
    }
}

/// DTO for updating a work order
#[derive(Debug, Clone, Default)]
pub struct UpdateWorkOrderDto {
    pub sub_package_id: Option<Option<Id>>,
    pub title: Option<String>,
    pub task: Option<String>,
    pub status: Option<WorkOrderStatus>,
    pub progress: Option<i32>,
    pub office: Option<String>,
    pub os_number: Option<String>,
    pub tag: Option<String>,
    pub machine_name: Option<String>,
    pub responsible: Option<String>,
}

const SELECT_COLUMNS: &str = r#"id, package_id, sub_package_id, title, task, status, progress,
       office, os_number, tag, machine_name, responsible,
       source_row, import_order, created_at, updated_at"#;

/// Work order repository implementation
pub struct WorkOrderRepository {
    pool: PgPool,
}

impl WorkOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every work order in a package, including the ones attached to
    /// its sub-packages. The import reconciliation reads this to build its
    /// duplicate set.
    pub async fn list_by_package(&self, package_id: Id) -> RepositoryResult<Vec<WorkOrder>> {
        let rows = sqlx::query_as::<_, WorkOrder>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM work_orders
            WHERE package_id = $1
            ORDER BY import_order ASC NULLS LAST, id ASC
            "#
        ))
        .bind(package_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// List the work orders attached to one sub-package
    pub async fn list_by_sub_package(&self, sub_package_id: Id) -> RepositoryResult<Vec<WorkOrder>> {
        let rows = sqlx::query_as::<_, WorkOrder>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM work_orders
            WHERE sub_package_id = $1
            ORDER BY import_order ASC NULLS LAST, id ASC
            "#
        ))
        .bind(sub_package_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Condensed view of every work order across the owner's packages
    pub async fn list_summaries(&self, owner_id: Id) -> RepositoryResult<Vec<WorkOrderSummary>> {
        let rows = sqlx::query_as::<_, WorkOrderSummary>(
            r#"
            SELECT w.id, w.package_id, w.os_number, w.title, w.status, w.progress
            FROM work_orders w
            JOIN packages p ON p.id = w.package_id
            WHERE p.owner_id = $1
            ORDER BY w.package_id ASC, w.import_order ASC NULLS LAST, w.id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Look up one summary by normalized OS number within the owner's
    /// packages. The caller normalizes; the query compares the stored
    /// value trimmed and lowercased.
    pub async fn find_summary_by_os(
        &self,
        owner_id: Id,
        normalized_os: &str,
    ) -> RepositoryResult<Option<WorkOrderSummary>> {
        let row = sqlx::query_as::<_, WorkOrderSummary>(
            r#"
            SELECT w.id, w.package_id, w.os_number, w.title, w.status, w.progress
            FROM work_orders w
            JOIN packages p ON p.id = w.package_id
            WHERE p.owner_id = $1 AND LOWER(TRIM(w.os_number)) = $2
            ORDER BY w.id ASC
            LIMIT 1
            "#,
        )
        .bind(owner_id)
        .bind(normalized_os)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl Repository<WorkOrder, CreateWorkOrderDto, UpdateWorkOrderDto> for WorkOrderRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<WorkOrder>> {
        let row = sqlx::query_as::<_, WorkOrder>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM work_orders
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, dto: CreateWorkOrderDto) -> RepositoryResult<WorkOrder> {
        let row = sqlx::query_as::<_, WorkOrder>(&format!(
            r#"
            INSERT INTO work_orders (
                package_id, sub_package_id, title, task, status, progress,
                office, os_number, tag, machine_name, responsible,
                source_row, import_order, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW(), NOW()
            )
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(dto.package_id)
        .bind(dto.sub_package_id)
        .bind(&dto.title)
        .bind(&dto.task)
        .bind(dto.status)
        .bind(dto.progress)
        .bind(&dto.office)
        .bind(&dto.os_number)
        .bind(&dto.tag)
        .bind(&dto.machine_name)
        .bind(&dto.responsible)
        .bind(dto.source_row)
        .bind(dto.import_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateWorkOrderDto) -> RepositoryResult<WorkOrder> {
        // sub_package_id is doubly optional: None leaves it alone,
        // Some(None) detaches the order from its sub-package.
        let (set_sub_package, sub_package_id) = match dto.sub_package_id {
            Some(value) => (true, value),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, WorkOrder>(&format!(
            r#"
            UPDATE work_orders SET
                sub_package_id = CASE WHEN $1 THEN $2 ELSE sub_package_id END,
                title = COALESCE($3, title),
                task = COALESCE($4, task),
                status = COALESCE($5, status),
                progress = COALESCE($6, progress),
                office = COALESCE($7, office),
                os_number = COALESCE($8, os_number),
                tag = COALESCE($9, tag),
                machine_name = COALESCE($10, machine_name),
                responsible = COALESCE($11, responsible),
                updated_at = NOW()
            WHERE id = $12
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(set_sub_package)
        .bind(sub_package_id)
        .bind(&dto.title)
        .bind(&dto.task)
        .bind(dto.status)
        .bind(dto.progress)
        .bind(&dto.office)
        .bind(&dto.os_number)
        .bind(&dto.tag)
        .bind(&dto.machine_name)
        .bind(&dto.responsible)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::NotFound(format!("WorkOrder with id {} not found", id))
        })?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM work_orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "WorkOrder with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
