//! Queued post-processing filters
//!
//! Filters are queued on a table while it is built and applied later, in
//! queue order, by whoever renders the table.

use crate::error::{Result, TableError};
use crate::row::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum QueuedFilter {
    /// Stable sort on one column. Rows missing the column sort last.
    Sort {
        column: String,
        #[serde(default)]
        descending: bool,
    },

    /// Keep `limit` rows starting at `offset` (all remaining rows when `limit` is unset).
    Limit {
        #[serde(default)]
        offset: usize,
        #[serde(default)]
        limit: Option<usize>,
    },

    /// Drop rows whose numeric column is below `min`. Missing values count as 0.
    ExcludeLowPopulation { column: String, min: f64 },
}

impl QueuedFilter {
    pub fn apply(&self, rows: &mut Vec<Row>) -> Result<()> {
        match self {
            QueuedFilter::Sort { column, descending } => sort_rows(rows, column, *descending),
            QueuedFilter::Limit { offset, limit } => {
                let offset = (*offset).min(rows.len());
                rows.drain(..offset);
                if let Some(limit) = limit {
                    rows.truncate(*limit);
                }
                Ok(())
            }
            QueuedFilter::ExcludeLowPopulation { column, min } => {
                rows.retain(|row| {
                    let value = row.column(column).and_then(Value::as_f64).unwrap_or(0.0);
                    value >= *min
                });
                Ok(())
            }
        }
    }
}

fn sort_rows(rows: &mut [Row], column: &str, descending: bool) -> Result<()> {
    let mut saw_number = false;
    let mut saw_text = false;
    for row in rows.iter() {
        match row.column(column) {
            None | Some(Value::Null) => {}
            Some(Value::Number(_)) => saw_number = true,
            Some(Value::String(_)) => saw_text = true,
            Some(_) => {
                return Err(TableError::IncomparableColumn {
                    column: column.to_string(),
                })
            }
        }
    }
    if saw_number && saw_text {
        return Err(TableError::IncomparableColumn {
            column: column.to_string(),
        });
    }

    rows.sort_by(|a, b| {
        let a = a.column(column).filter(|v| !v.is_null());
        let b = b.column(column).filter(|v| !v.is_null());
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ord = compare_values(a, b);
                if descending {
                    ord.reverse()
                } else {
                    ord
                }
            }
        }
    });
    Ok(())
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.total_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
