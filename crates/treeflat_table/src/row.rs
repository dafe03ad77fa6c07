//! Rows and their subtable links.

use crate::table::Table;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::mem;

/// Column holding the row's display label.
pub const LABEL_COLUMN: &str = "label";
/// Metadata key holding the row's logo (icon path or URL).
pub const LOGO_METADATA: &str = "logo";
/// Metadata flag set on flattened rows when aggregate rows are included (1 = interior, 0 = leaf).
pub const IS_AGGREGATE_METADATA: &str = "is_aggregate";

/// Identifier of a subtable that can be fetched with a secondary request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtableId(u64);

impl SubtableId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubtableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SubtableId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A row's link to its child table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subtable {
    /// The row has no children.
    #[default]
    None,
    /// The row has children that are not loaded yet.
    Pending(SubtableId),
    /// The children are resident in memory.
    Loaded(Box<Table>),
}

impl Subtable {
    pub fn is_none(&self) -> bool {
        matches!(self, Subtable::None)
    }
}

/// A report row: named column values, metadata and an optional subtable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub columns: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Subtable::is_none")]
    pub subtable: Subtable,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row with only a label column
    pub fn with_label(label: impl Into<String>) -> Self {
        Self::new().with_column(LABEL_COLUMN, label.into())
    }

    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.insert(name.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Attach a resident child table
    pub fn with_subtable(mut self, table: Table) -> Self {
        self.subtable = Subtable::Loaded(Box::new(table));
        self
    }

    /// Attach a child table that has to be fetched by id
    pub fn with_pending_subtable(mut self, id: SubtableId) -> Self {
        self.subtable = Subtable::Pending(id);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    pub fn set_column(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(name.into(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// The label rendered as text, or `None` when the row has no label column.
    ///
    /// Numbers and booleans are rendered the way report labels print them;
    /// a `null` label renders as the empty string.
    pub fn label(&self) -> Option<String> {
        self.column(LABEL_COLUMN).map(label_text)
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.set_column(LABEL_COLUMN, label.into());
    }

    pub fn logo(&self) -> Option<&Value> {
        self.metadata(LOGO_METADATA)
    }

    pub fn has_subtable(&self) -> bool {
        !self.subtable.is_none()
    }

    /// Id of a subtable that still has to be fetched
    pub fn pending_subtable_id(&self) -> Option<SubtableId> {
        match self.subtable {
            Subtable::Pending(id) => Some(id),
            _ => None,
        }
    }

    /// Move the subtable link out of the row, leaving it without children.
    pub fn take_subtable(&mut self) -> Subtable {
        mem::take(&mut self.subtable)
    }

    pub fn remove_subtable(&mut self) {
        self.subtable = Subtable::None;
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
