//! # wo-models
//!
//! Domain models for Parada OS: packages, sub-packages, work orders, and
//! work-order logs. A package holds many sub-packages and many work orders;
//! a work order's sub-package link is optional, so an order may hang off a
//! package directly.

pub mod package;
pub mod sub_package;
pub mod work_order;
pub mod work_order_log;

pub use package::{Package, PackageStatus};
pub use sub_package::SubPackage;
pub use work_order::{clamp_progress, WorkOrder, WorkOrderStatus, WorkOrderSummary};
pub use work_order_log::WorkOrderLog;
