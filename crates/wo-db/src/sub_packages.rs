//! Sub-package repository

use async_trait::async_trait;
use sqlx::PgPool;
use wo_core::traits::Id;
use wo_models::SubPackage;

use crate::repository::{Repository, RepositoryError, RepositoryResult};

/// DTO for creating a sub-package
#[derive(Debug, Clone)]
pub struct CreateSubPackageDto {
    pub package_id: Id,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a sub-package
#[derive(Debug, Clone, Default)]
pub struct UpdateSubPackageDto {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Sub-package repository implementation
pub struct SubPackageRepository {
    pool: PgPool,
}

impl SubPackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the sub-packages of a package, in creation order
    pub async fn list_by_package(&self, package_id: Id) -> RepositoryResult<Vec<SubPackage>> {
        let rows = sqlx::query_as::<_, SubPackage>(
            r#"
            SELECT id, package_id, name, description, created_at, updated_at
            FROM sub_packages
            WHERE package_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(package_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl Repository<SubPackage, CreateSubPackageDto, UpdateSubPackageDto> for SubPackageRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<SubPackage>> {
        let row = sqlx::query_as::<_, SubPackage>(
            r#"
            SELECT id, package_id, name, description, created_at, updated_at
            FROM sub_packages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, dto: CreateSubPackageDto) -> RepositoryResult<SubPackage> {
        let row = sqlx::query_as::<_, SubPackage>(
            r#"
            INSERT INTO sub_packages (package_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, package_id, name, description, created_at, updated_at
            "#,
        )
        .bind(dto.package_id)
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateSubPackageDto) -> RepositoryResult<SubPackage> {
        let row = sqlx::query_as::<_, SubPackage>(
            r#"
            UPDATE sub_packages SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                updated_at = NOW()
            WHERE id = $3
            RETURNING id, package_id, name, description, created_at, updated_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::NotFound(format!("SubPackage with id {} not found", id))
        })?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM sub_packages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "SubPackage with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
