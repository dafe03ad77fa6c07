//! Tree Flattener - nested report tables as one flat table
//!
//! Some reports are hierarchical: a row (`/blog`) owns a subtable of rows
//! (`/2024`, `/2025`), which own subtables of their own. Flattening walks
//! the whole tree depth-first and emits one table whose labels carry the
//! full path (`blog/2024/hello-world`).
//!
//! # Flatten Pass
//!
//! 1. Pick the label separator once, from the report identity
//! 2. Optionally apply queued filters (aggregate-row mode only)
//! 3. Start from an empty clone of the input table
//! 4. For every row: rewrite the label, inherit the logo, load the subtable
//! 5. Leaves are appended; interior rows are appended only in aggregate mode,
//!    then their children are visited with the extended prefix
//!
//! Subtables that are not resident are fetched through a [`SubtableLoader`].
//! The secondary request always has the `flat` directive removed so the
//! child comes back in tree shape.

pub mod config;
pub mod error;
pub mod flattener;
pub mod loader;
pub mod manipulator;
pub mod options;
pub mod request;

pub use config::{ConfigError, TreeflatConfig};
pub use error::{FlattenError, LoadError, Result};
pub use flattener::Flattener;
pub use loader::{DirectoryFetcher, FetchingLoader, ResidentLoader, SubtableFetcher, SubtableLoader};
pub use manipulator::{manipulate, TableManipulator};
pub use options::{FlattenOptions, SeparatorPolicy, DEFAULT_SEPARATOR, PATH_SEPARATOR};
pub use request::{is_flatten_requested, strip_flatten_directive, FetchContext};
