//! Tables: ordered rows plus table-level metadata and queued filters.

use crate::error::Result;
use crate::filter::QueuedFilter;
use crate::row::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in display order
    #[serde(default)]
    pub rows: Vec<Row>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,

    /// Filters not applied yet, in application order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queued_filters: Vec<QueuedFilter>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_filter(mut self, filter: QueuedFilter) -> Self {
        self.queued_filters.push(filter);
        self
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn queued_filters(&self) -> &[QueuedFilter] {
        &self.queued_filters
    }

    /// Apply and drain the filter queue. Each filter runs exactly once.
    pub fn apply_queued_filters(&mut self) -> Result<()> {
        let filters = std::mem::take(&mut self.queued_filters);
        for filter in &filters {
            filter.apply(&mut self.rows)?;
        }
        Ok(())
    }

    /// A table with the same metadata and filter queue but no rows.
    pub fn empty_clone(&self) -> Table {
        Table {
            rows: Vec::new(),
            metadata: self.metadata.clone(),
            queued_filters: self.queued_filters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_clone_keeps_filters_and_metadata() {
        let table = Table::with_rows(vec![Row::with_label("a"), Row::with_label("b")])
            .with_metadata("period", "day")
            .with_filter(QueuedFilter::Limit {
                offset: 0,
                limit: Some(1),
            });

        let clone = table.empty_clone();
        assert!(clone.is_empty());
        assert_eq!(clone.metadata("period"), Some(&json!("day")));
        assert_eq!(clone.queued_filters(), table.queued_filters());
    }

    #[test]
    fn test_apply_queued_filters_drains_queue() {
        let mut table = Table::with_rows(vec![
            Row::with_label("a").with_column("nb_visits", 1),
            Row::with_label("b").with_column("nb_visits", 9),
            Row::with_label("c").with_column("nb_visits", 5),
        ])
        .with_filter(QueuedFilter::Sort {
            column: "nb_visits".into(),
            descending: true,
        })
        .with_filter(QueuedFilter::Limit {
            offset: 0,
            limit: Some(2),
        });

        table.apply_queued_filters().unwrap();
        let labels: Vec<_> = table.rows().iter().filter_map(Row::label).collect();
        assert_eq!(labels, vec!["b", "c"]);
        assert!(table.queued_filters().is_empty());

        // A second pass is a no-op
        table.apply_queued_filters().unwrap();
        assert_eq!(table.row_count(), 2);
    }
}
