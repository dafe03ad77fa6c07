//! Flatten options and separator selection.

use crate::request::INCLUDE_AGGREGATE_ROWS_PARAM;
use serde::{Deserialize, Serialize};
use treeflat_table::RequestParams;

/// Separator for human-readable breakdowns ("Germany - Berlin")
pub const DEFAULT_SEPARATOR: &str = " - ";
/// Separator for path-like breakdowns ("blog/2024/post")
pub const PATH_SEPARATOR: &str = "/";
/// Nested subtable levels allowed below the top-level table
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Per-call flatten options. Fixed for the duration of one flatten pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    /// Emit interior rows (tagged `is_aggregate = 1`) before their descendants
    pub include_aggregate_rows: bool,

    /// Maximum subtable nesting before the pass fails with `TreeTooDeep`
    pub max_depth: usize,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            include_aggregate_rows: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FlattenOptions {
    /// Options requested through report parameters (`include_aggregate_rows=1`).
    pub fn from_request(params: &RequestParams) -> Self {
        Self {
            include_aggregate_rows: params.is_enabled(INCLUDE_AGGREGATE_ROWS_PARAM),
            ..Self::default()
        }
    }

    pub fn with_aggregate_rows(mut self, include: bool) -> Self {
        self.include_aggregate_rows = include;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Chooses the label separator from the report identity.
///
/// Reports in one of `path_modules`, or whose method is one of
/// `path_methods`, get `path_separator`; everything else gets
/// `default_separator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparatorPolicy {
    pub default_separator: String,
    pub path_separator: String,
    pub path_modules: Vec<String>,
    pub path_methods: Vec<String>,
}

impl Default for SeparatorPolicy {
    fn default() -> Self {
        Self {
            default_separator: DEFAULT_SEPARATOR.to_string(),
            path_separator: PATH_SEPARATOR.to_string(),
            path_modules: vec!["Actions".to_string()],
            path_methods: vec!["getWebsites".to_string()],
        }
    }
}

impl SeparatorPolicy {
    pub fn separator_for(&self, module: &str, method: &str) -> &str {
        let is_path_report = self.path_modules.iter().any(|m| m == module)
            || self.path_methods.iter().any(|m| m == method);
        if is_path_report {
            &self.path_separator
        } else {
            &self.default_separator
        }
    }
}
