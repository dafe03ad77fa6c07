//! Output formatting for flattened reports

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table as DisplayTable};
use serde_json::Value;
use std::collections::BTreeSet;
use treeflat_table::{Report, Row, Table, IS_AGGREGATE_METADATA, LABEL_COLUMN, LOGO_METADATA};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The report as JSON, same shape as the input
    Json,
    /// One terminal table per report table
    Table,
}

pub fn render_json(report: &Report) -> Result<String> {
    report.to_json_pretty().context("Failed to serialize report")
}

/// Render every table of the report, headed by its collection path.
pub fn render_table(report: &Report) -> String {
    let mut out = String::new();
    for (path, table) in report.tables() {
        if !path.is_empty() {
            out.push_str(&path);
            out.push('\n');
        }
        out.push_str(&display_table(table).to_string());
        out.push('\n');
    }
    out
}

fn display_table(table: &Table) -> DisplayTable {
    let columns: BTreeSet<&str> = table
        .rows()
        .iter()
        .flat_map(|row| row.columns.keys().map(String::as_str))
        .filter(|name| *name != LABEL_COLUMN)
        .collect();
    let show_aggregate = table
        .rows()
        .iter()
        .any(|row| row.metadata(IS_AGGREGATE_METADATA).is_some());
    let show_logo = table.rows().iter().any(|row| row.logo().is_some());

    let mut header = vec![Cell::new(LABEL_COLUMN)];
    header.extend(columns.iter().map(Cell::new));
    if show_aggregate {
        header.push(Cell::new(IS_AGGREGATE_METADATA));
    }
    if show_logo {
        header.push(Cell::new(LOGO_METADATA));
    }

    let mut display = DisplayTable::new();
    display
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for row in table.rows() {
        display.add_row(row_cells(row, &columns, show_aggregate, show_logo));
    }
    display
}

fn row_cells(
    row: &Row,
    columns: &BTreeSet<&str>,
    show_aggregate: bool,
    show_logo: bool,
) -> Vec<Cell> {
    let mut cells = vec![Cell::new(row.label().unwrap_or_default())];
    cells.extend(columns.iter().map(|name| Cell::new(format_value(row.column(name)))));
    if show_aggregate {
        cells.push(Cell::new(format_value(row.metadata(IS_AGGREGATE_METADATA))));
    }
    if show_logo {
        cells.push(Cell::new(format_value(row.logo())));
    }
    cells
}

fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
