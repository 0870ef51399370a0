//! Repository trait and error types
//!
//! Every entity repository exposes the same CRUD surface; parent-scoped
//! list queries live on the concrete repositories.

use async_trait::async_trait;
use wo_core::traits::Id;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, CreateDto, UpdateDto>: Send + Sync {
    /// Find an entity by ID
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<T>>;

    /// Create a new entity, returning it with server-stamped timestamps
    async fn create(&self, dto: CreateDto) -> RepositoryResult<T>;

    /// Update an existing entity; fields absent from the DTO stay untouched
    async fn update(&self, id: Id, dto: UpdateDto) -> RepositoryResult<T>;

    /// Delete an entity by ID
    async fn delete(&self, id: Id) -> RepositoryResult<()>;
}
