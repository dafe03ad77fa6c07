//! Report table model
//!
//! A [`Table`] is an ordered list of [`Row`]s plus table-level metadata and a
//! queue of post-processing filters. A row may own one child table (its
//! subtable), which is either resident in memory or only referenced by id
//! and loaded on demand.
//!
//! Reports are either a single table or a keyed collection of reports
//! (one entry per period or per site).

pub mod error;
pub mod filter;
pub mod report;
pub mod request;
pub mod row;
pub mod table;

pub use error::{Result, TableError};
pub use filter::QueuedFilter;
pub use report::Report;
pub use request::{ReportRequest, RequestParams};
pub use row::{Row, Subtable, SubtableId, IS_AGGREGATE_METADATA, LABEL_COLUMN, LOGO_METADATA};
pub use table::Table;
