//! CLI subcommands

pub mod flatten;
pub mod output;
