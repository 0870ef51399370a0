//! Package model
//!
//! A package is the top-level grouping of work, e.g. one maintenance
//! shutdown project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wo_core::traits::{Id, Identifiable};

/// Package lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum PackageStatus {
    #[default]
    Open,
    Closed,
}

/// Package entity
#[derive(Debug, Clone, Serialize, Deserialize, Default, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: Option<Id>,
    pub name: String,
    pub description: Option<String>,
    pub status: PackageStatus,
    pub owner_id: Id,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Package {
    pub fn new(name: impl Into<String>, owner_id: Id) -> Self {
        Self {
            name: name.into(),
            owner_id,
            ..Default::default()
        }
    }
}

impl Identifiable for Package {
    fn id(&self) -> Option<Id> {
        self.id
    }
}
