//! Table model error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TableError>;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Cannot sort by column '{column}': values are not mutually comparable")]
    IncomparableColumn { column: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
