//! Sub-package model
//!
//! A subdivision of a package, typically by workshop (mechanical,
//! electrical, or a custom team). Created manually or auto-created by the
//! import reconciliation when an unmatched office shows up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wo_core::traits::{Id, Identifiable};

/// Sub-package entity
#[derive(Debug, Clone, Serialize, Deserialize, Default, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubPackage {
    pub id: Option<Id>,
    pub package_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SubPackage {
    pub fn new(package_id: Id, name: impl Into<String>) -> Self {
        Self {
            package_id,
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Identifiable for SubPackage {
    fn id(&self) -> Option<Id> {
        self.id
    }
}
