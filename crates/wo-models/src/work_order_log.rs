//! Work order log model
//!
//! Append-only audit trail attached to a work order. Entries are never
//! mutated or deleted individually; they go away only when the parent is
//! removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wo_core::traits::{Id, Identifiable};

/// Work order log entry
#[derive(Debug, Clone, Serialize, Deserialize, Default, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderLog {
    pub id: Option<Id>,
    pub work_order_id: Id,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl WorkOrderLog {
    pub fn new(work_order_id: Id, message: impl Into<String>) -> Self {
        Self {
            work_order_id,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Log entry recording a progress change.
    pub fn progress_change(work_order_id: Id, from: i32, to: i32) -> Self {
        Self::new(work_order_id, format!("progress {from}% -> {to}%"))
    }
}

impl Identifiable for WorkOrderLog {
    fn id(&self) -> Option<Id> {
        self.id
    }
}
