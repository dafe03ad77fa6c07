//! Flattening error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use treeflat_table::{SubtableId, TableError};

pub type Result<T> = std::result::Result<T, FlattenError>;

/// Failure to resolve a row's subtable.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Subtable {0} is not resident and no fetcher is configured")]
    NotResident(SubtableId),

    #[error("Secondary request has no usable idSubtable parameter")]
    MissingSubtableId,

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid subtable JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fetch failed: {0}")]
    Fetch(String),
}

#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("Failed to apply queued filters: {0}")]
    Filter(#[from] TableError),

    #[error("Failed to load subtable of row '{label}': {source}")]
    SubtableLoad {
        label: String,
        #[source]
        source: LoadError,
    },

    #[error("Tree too deep: more than {max_depth} nested subtable levels")]
    TreeTooDeep { max_depth: usize },
}
