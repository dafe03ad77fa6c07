//! The flatten pass
//!
//! Walks a table tree depth-first and emits rows in pre-order. Each emitted
//! row's label is the path of trimmed ancestor labels joined by the
//! separator; rows without a logo inherit the nearest ancestor's.

use crate::error::{FlattenError, Result};
use crate::loader::SubtableLoader;
use crate::manipulator::{manipulate, TableManipulator};
use crate::options::{FlattenOptions, SeparatorPolicy, PATH_SEPARATOR};
use crate::request::{strip_flatten_directive, FetchContext};
use serde_json::Value;
use tracing::debug;
use treeflat_table::{
    Report, ReportRequest, RequestParams, Row, Table, IS_AGGREGATE_METADATA, LOGO_METADATA,
};

/// Flattens report tables for one request.
///
/// The separator is chosen once, when the flattener is built, and stays
/// fixed for every table it processes.
#[derive(Debug, Clone)]
pub struct Flattener {
    request: ReportRequest,
    options: FlattenOptions,
    separator: String,
}

impl Flattener {
    pub fn new(request: ReportRequest, policy: &SeparatorPolicy, options: FlattenOptions) -> Self {
        let separator = policy
            .separator_for(&request.module, &request.method)
            .to_string();
        Self {
            request,
            options,
            separator,
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn options(&self) -> FlattenOptions {
        self.options
    }

    pub fn request(&self) -> &ReportRequest {
        &self.request
    }

    /// Flatten every table of a report. Collections keep their keys.
    pub fn flatten(&self, report: Report, loader: &dyn SubtableLoader) -> Result<Report> {
        debug!(
            "Flattening {} (separator {:?}, aggregate rows: {})",
            self.request.qualified_name(),
            self.separator,
            self.options.include_aggregate_rows
        );
        manipulate(self, report, &self.request, loader)
    }

    /// Flatten a single table.
    pub fn flatten_table(&self, table: Table, loader: &dyn SubtableLoader) -> Result<Table> {
        let rewrite = |params: RequestParams| self.rewrite_subtable_request(params);
        let ctx = FetchContext::new(&self.request, &rewrite);
        self.manipulate_table(table, loader, &ctx)
    }
}

impl TableManipulator for Flattener {
    fn manipulate_table(
        &self,
        mut table: Table,
        loader: &dyn SubtableLoader,
        ctx: &FetchContext<'_>,
    ) -> Result<Table> {
        if self.options.include_aggregate_rows {
            table.apply_queued_filters()?;
        }

        let mut pass = FlattenPass {
            separator: &self.separator,
            options: self.options,
            loader,
            ctx,
            output: table.empty_clone(),
            summary: FlattenSummary::default(),
        };
        for row in table.into_rows() {
            pass.flatten_row(row, "", None, 0)?;
        }

        let summary = pass.summary;
        debug!(
            "Flattened table: {} rows ({} aggregate), {} subtables, depth {}",
            summary.rows_emitted,
            summary.aggregate_rows,
            summary.subtables_loaded,
            summary.deepest_level
        );
        Ok(pass.output)
    }

    fn rewrite_subtable_request(&self, params: RequestParams) -> RequestParams {
        strip_flatten_directive(params)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct FlattenSummary {
    rows_emitted: usize,
    aggregate_rows: usize,
    subtables_loaded: usize,
    deepest_level: usize,
}

/// State of one table's flatten pass.
struct FlattenPass<'p, 'c> {
    separator: &'p str,
    options: FlattenOptions,
    loader: &'p dyn SubtableLoader,
    ctx: &'p FetchContext<'c>,
    output: Table,
    summary: FlattenSummary,
}

impl FlattenPass<'_, '_> {
    fn flatten_row(
        &mut self,
        mut row: Row,
        prefix: &str,
        parent_logo: Option<&Value>,
        depth: usize,
    ) -> Result<()> {
        let label = row.label().map(|label| {
            let label = label.trim();
            let label = if self.separator == PATH_SEPARATOR {
                label.strip_prefix('/').unwrap_or(label)
            } else {
                label
            };
            format!("{}{}", prefix, label)
        });
        if let Some(label) = &label {
            row.set_label(label.clone());
        }

        if row.logo().is_none() {
            if let Some(logo) = parent_logo {
                row.set_metadata(LOGO_METADATA, logo.clone());
            }
        }
        let logo = row.logo().cloned();

        let subtable = self
            .loader
            .load_subtable(&mut row, self.ctx)
            .map_err(|source| FlattenError::SubtableLoad {
                label: label.clone().unwrap_or_default(),
                source,
            })?;
        row.remove_subtable();

        let Some(subtable) = subtable else {
            if self.options.include_aggregate_rows {
                row.set_metadata(IS_AGGREGATE_METADATA, 0);
            }
            self.emit(row);
            return Ok(());
        };

        if depth >= self.options.max_depth {
            return Err(FlattenError::TreeTooDeep {
                max_depth: self.options.max_depth,
            });
        }
        self.summary.subtables_loaded += 1;
        self.summary.deepest_level = self.summary.deepest_level.max(depth + 1);

        if self.options.include_aggregate_rows {
            row.set_metadata(IS_AGGREGATE_METADATA, 1);
            self.summary.aggregate_rows += 1;
            self.emit(row);
        }

        // A row without a label still contributes an empty path segment
        let child_prefix = format!("{}{}", label.as_deref().unwrap_or(""), self.separator);
        for child in subtable.into_rows() {
            self.flatten_row(child, &child_prefix, logo.as_ref(), depth + 1)?;
        }
        Ok(())
    }

    fn emit(&mut self, row: Row) {
        self.summary.rows_emitted += 1;
        self.output.add_row(row);
    }
}
