//! Work order (O.S.) model
//!
//! An individual schedulable service task with a completion percentage.
//! Progress is always clamped to [0, 100] and rounded to the nearest
//! integer before persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wo_core::traits::{Id, Identifiable};

/// Work order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Todo,
    #[default]
    Pending,
    Done,
}

/// Work order entity
#[derive(Debug, Clone, Serialize, Deserialize, Default, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: Option<Id>,
    pub package_id: Id,
    /// Optional: a work order may belong to a package directly, with no
    /// sub-package.
    pub sub_package_id: Option<Id>,
    pub title: String,
    pub task: Option<String>,
    pub status: WorkOrderStatus,
    /// Completion percentage, 0..=100
    pub progress: i32,
    pub office: Option<String>,
    pub os_number: Option<String>,
    pub tag: Option<String>,
    pub machine_name: Option<String>,
    pub responsible: Option<String>,
    /// 1-based spreadsheet row this order was imported from
    pub source_row: Option<i32>,
    /// Position within the import batch, for stable ordering
    pub import_order: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkOrder {
    pub fn new(title: impl Into<String>, package_id: Id) -> Self {
        Self {
            title: title.into(),
            package_id,
            ..Default::default()
        }
    }

    /// Set the progress, applying the clamping invariant.
    pub fn set_progress(&mut self, value: f64) {
        self.progress = clamp_progress(value);
    }
}

/// Condensed read-only view of a work order, keyed by OS number on the
/// dashboard's summary screens.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderSummary {
    pub id: Option<Id>,
    pub package_id: Id,
    pub os_number: Option<String>,
    pub title: String,
    pub status: WorkOrderStatus,
    pub progress: i32,
}

/// Clamp a raw progress value into the persisted form: rounded to the
/// nearest integer, then bounded to [0, 100].
pub fn clamp_progress(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    (value.round() as i64).clamp(0, 100) as i32
}

impl Identifiable for WorkOrder {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_below_zero() {
        assert_eq!(clamp_progress(-5.0), 0);
    }

    #[test]
    fn test_clamp_above_hundred() {
        assert_eq!(clamp_progress(137.0), 100);
    }

    #[test]
    fn test_rounds_to_nearest() {
        assert_eq!(clamp_progress(42.6), 43);
        assert_eq!(clamp_progress(42.4), 42);
    }

    #[test]
    fn test_in_range_untouched() {
        assert_eq!(clamp_progress(0.0), 0);
        assert_eq!(clamp_progress(100.0), 100);
        assert_eq!(clamp_progress(55.0), 55);
    }

    #[test]
    fn test_nan_becomes_zero() {
        assert_eq!(clamp_progress(f64::NAN), 0);
    }

    #[test]
    fn test_set_progress_clamps() {
        let mut order = WorkOrder::new("Trocar rolamento", 1);
        order.set_progress(137.0);
        assert_eq!(order.progress, 100);
    }
}
