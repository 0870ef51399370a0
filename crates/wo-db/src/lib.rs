//! # wo-db
//!
//! Database layer for Parada OS.
//!
//! This crate is the persistence adapter: a PostgreSQL connection pool plus
//! one repository per entity, each a thin wrapper over create/update/list
//! queries. The pool is constructed once at startup and injected into every
//! repository; there are no process-wide database handles.
//!
//! ## Example
//!
//! ```ignore
//! use wo_db::{Database, DatabaseConfig};
//! use wo_db::work_orders::WorkOrderRepository;
//!
//! let config = DatabaseConfig::from_env();
//! let db = Database::connect(&config).await?;
//!
//! let repo = WorkOrderRepository::new(db.pool().clone());
//! let orders = repo.list_by_package(1).await?;
//! ```

pub mod packages;
pub mod pool;
pub mod repository;
pub mod sub_packages;
pub mod work_order_logs;
pub mod work_orders;

// Re-exports
pub use packages::{CreatePackageDto, PackageRepository, UpdatePackageDto};
pub use pool::{Database, DatabaseConfig, PoolStats};
pub use repository::{Repository, RepositoryError, RepositoryResult};
pub use sub_packages::{CreateSubPackageDto, SubPackageRepository, UpdateSubPackageDto};
pub use work_order_logs::WorkOrderLogRepository;
pub use work_orders::{CreateWorkOrderDto, UpdateWorkOrderDto, WorkOrderRepository};
