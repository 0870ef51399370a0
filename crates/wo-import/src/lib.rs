//! # wo-import
//!
//! The Excel bulk-import pipeline: spreadsheet parsing, field
//! normalization, and the reconciliation pass that decides which rows become
//! new work orders, which are duplicates, and which sub-packages need to be
//! auto-created along the way.
//!
//! Data flow: file bytes → [`parser::SheetParser`] → rows →
//! [`reconcile::reconcile`] (consulting existing package state) → writes
//! through an [`reconcile::ImportStore`] → [`reconcile::ImportSummary`].

pub mod error;
pub mod normalize;
pub mod parser;
pub mod reconcile;
pub mod store;

pub use error::ImportError;
pub use normalize::{normalize_os_number, normalize_text, OfficeKey};
pub use parser::{ParsedRow, SheetParser};
pub use reconcile::{reconcile, ImportStore, ImportSummary, TargetPackage};
pub use store::PgImportStore;
