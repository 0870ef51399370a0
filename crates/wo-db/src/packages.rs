//! Package repository
//!
//! Packages are owner-scoped: list queries only return packages created by
//! the requesting user. Deleting a package cascades to its sub-packages,
//! work orders, and logs (enforced by the schema's foreign keys).

use async_trait::async_trait;
use sqlx::PgPool;
use wo_core::traits::Id;
use wo_models::{Package, PackageStatus};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

/// DTO for creating a package
#[derive(Debug, Clone)]
pub struct CreatePackageDto {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Id,
}

/// DTO for updating a package
#[derive(Debug, Clone, Default)]
pub struct UpdatePackageDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<PackageStatus>,
}

/// Package repository implementation
pub struct PackageRepository {
    pool: PgPool,
}

impl PackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all packages owned by a user, newest first
    pub async fn list_by_owner(&self, owner_id: Id) -> RepositoryResult<Vec<Package>> {
        let rows = sqlx::query_as::<_, Package>(
            r#"
            SELECT id, name, description, status, owner_id, created_at, updated_at
            FROM packages
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl Repository<Package, CreatePackageDto, UpdatePackageDto> for PackageRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Package>> {
        let row = sqlx::query_as::<_, Package>(
            r#"
            SELECT id, name, description, status, owner_id, created_at, updated_at
            FROM packages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, dto: CreatePackageDto) -> RepositoryResult<Package> {
        let row = sqlx::query_as::<_, Package>(
            r#"
            INSERT INTO packages (name, description, status, owner_id, created_at, updated_at)
            VALUES ($1, $2, 'open', $3, NOW(), NOW())
            RETURNING id, name, description, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdatePackageDto) -> RepositoryResult<Package> {
        let row = sqlx::query_as::<_, Package>(
            r#"
            UPDATE packages SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                status = COALESCE($3, status),
                updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, description, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("Package with id {} not found", id)))?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM packages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Package with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
