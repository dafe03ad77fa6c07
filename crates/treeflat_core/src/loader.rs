//! Subtable loading
//!
//! A loader resolves a row's child table. Resident subtables are moved out
//! of the row; pending ones are fetched with a secondary request derived
//! from the parent request.

use crate::error::LoadError;
use crate::request::{FetchContext, SUBTABLE_ID_PARAM};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use treeflat_table::{ReportRequest, Row, Subtable, SubtableId, Table};

/// Resolves a row's subtable.
pub trait SubtableLoader {
    /// Return the row's child table, or `None` when the row has no children.
    ///
    /// The row's subtable link may be consumed.
    fn load_subtable(
        &self,
        row: &mut Row,
        ctx: &FetchContext<'_>,
    ) -> Result<Option<Table>, LoadError>;
}

/// Issues secondary requests for subtables that are not in memory.
pub trait SubtableFetcher {
    fn fetch(&self, request: &ReportRequest) -> Result<Table, LoadError>;
}

/// Loader for fully materialized trees. Pending subtables are an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResidentLoader;

impl SubtableLoader for ResidentLoader {
    fn load_subtable(
        &self,
        row: &mut Row,
        _ctx: &FetchContext<'_>,
    ) -> Result<Option<Table>, LoadError> {
        match row.take_subtable() {
            Subtable::None => Ok(None),
            Subtable::Loaded(table) => Ok(Some(*table)),
            Subtable::Pending(id) => Err(LoadError::NotResident(id)),
        }
    }
}

/// Uses resident subtables when present, otherwise fetches them.
#[derive(Debug, Clone)]
pub struct FetchingLoader<F> {
    fetcher: F,
}

impl<F: SubtableFetcher> FetchingLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl<F: SubtableFetcher> SubtableLoader for FetchingLoader<F> {
    fn load_subtable(
        &self,
        row: &mut Row,
        ctx: &FetchContext<'_>,
    ) -> Result<Option<Table>, LoadError> {
        match row.take_subtable() {
            Subtable::None => Ok(None),
            Subtable::Loaded(table) => Ok(Some(*table)),
            Subtable::Pending(id) => {
                let request = ctx.subtable_request(id);
                debug!(
                    "Fetching subtable {} for {} with {} params",
                    id,
                    request.qualified_name(),
                    request.params.len()
                );
                self.fetcher.fetch(&request).map(Some)
            }
        }
    }
}

/// Serves secondary requests from `<root>/<idSubtable>.json`, one table per file.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, id: SubtableId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

impl SubtableFetcher for DirectoryFetcher {
    fn fetch(&self, request: &ReportRequest) -> Result<Table, LoadError> {
        let id: SubtableId = request
            .params
            .get(SUBTABLE_ID_PARAM)
            .and_then(|raw| raw.parse().ok())
            .ok_or(LoadError::MissingSubtableId)?;

        let path = self.path_for(id);
        let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let table: Table = serde_json::from_str(&content)?;
        Ok(table)
    }
}
