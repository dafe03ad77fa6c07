//! Reports: a single table or a keyed collection (per period, per site).

use crate::error::Result;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Report {
    Table(Table),
    Collection(BTreeMap<String, Report>),
}

impl Report {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Report::Table(table) => Some(table),
            Report::Collection(_) => None,
        }
    }

    /// Every table in the report with its collection path (`"2024-01/site-1"`).
    pub fn tables(&self) -> Vec<(String, &Table)> {
        let mut out = Vec::new();
        collect_tables(self, String::new(), &mut out);
        out
    }
}

impl From<Table> for Report {
    fn from(table: Table) -> Self {
        Report::Table(table)
    }
}

fn collect_tables<'a>(report: &'a Report, path: String, out: &mut Vec<(String, &'a Table)>) {
    match report {
        Report::Table(table) => out.push((path, table)),
        Report::Collection(children) => {
            for (key, child) in children {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}/{}", path, key)
                };
                collect_tables(child, child_path, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;

    #[test]
    fn test_parse_collection() {
        let json = r#"{
            "collection": {
                "2024-01-01": { "table": { "rows": [ { "columns": { "label": "a" } } ] } },
                "2024-01-02": { "table": {} }
            }
        }"#;
        let report = Report::from_json(json).unwrap();
        let tables = report.tables();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].0, "2024-01-01");
        assert_eq!(tables[0].1.row_count(), 1);
        assert!(tables[1].1.is_empty());
    }

    #[test]
    fn test_table_report_json_round_trip() {
        let report = Report::from(Table::with_rows(vec![Row::with_label("a")]));
        let json = report.to_json_pretty().unwrap();
        let parsed = Report::from_json(&json).unwrap();
        assert_eq!(parsed.as_table().map(Table::row_count), Some(1));
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Report::from_json("{\"table\": [").is_err());
    }
}
