//! Postgres-backed import store
//!
//! Bridges the reconciliation engine to the wo-db repositories.

use async_trait::async_trait;
use sqlx::PgPool;

use wo_core::traits::{Id, Identifiable};
use wo_db::{
    CreateSubPackageDto, CreateWorkOrderDto, Repository, SubPackageRepository, WorkOrderRepository,
};

use crate::error::ImportError;
use crate::reconcile::ImportStore;

/// Import store writing through the real repositories
pub struct PgImportStore {
    sub_packages: SubPackageRepository,
    work_orders: WorkOrderRepository,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sub_packages: SubPackageRepository::new(pool.clone()),
            work_orders: WorkOrderRepository::new(pool),
        }
    }
}

#[async_trait]
impl ImportStore for PgImportStore {
    async fn create_sub_package(&self, package_id: Id, name: &str) -> Result<Id, ImportError> {
        let sub = self
            .sub_packages
            .create(CreateSubPackageDto {
                package_id,
                name: name.to_string(),
                description: None,
            })
            .await?;
        sub.id()
            .ok_or_else(|| ImportError::Backend("created sub-package has no id".into()))
    }

    async fn create_work_order(&self, dto: CreateWorkOrderDto) -> Result<Id, ImportError> {
        let order = self.work_orders.create(dto).await?;
        order
            .id()
            .ok_or_else(|| ImportError::Backend("created work order has no id".into()))
    }
}
