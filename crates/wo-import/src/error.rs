//! Import pipeline errors
//!
//! The batch is not transactional: a backend failure mid-run surfaces here
//! and halts further rows, but work orders already created stay created.

use thiserror::Error;
use wo_db::RepositoryError;

/// Error type for the import pipeline
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Spreadsheet could not be decoded: {0}")]
    Parse(String),

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,

    #[error("Backend error during import: {0}")]
    Backend(String),
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Parse(err.to_string())
    }
}

impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        ImportError::Backend(err.to_string())
    }
}
