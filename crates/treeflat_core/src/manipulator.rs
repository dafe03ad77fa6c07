//! Per-table report manipulation
//!
//! A manipulator transforms one table at a time. [`manipulate`] walks a
//! report (single table or collection) and hands each table to it, keeping
//! collection keys.

use crate::error::Result;
use crate::loader::SubtableLoader;
use crate::request::FetchContext;
use std::collections::BTreeMap;
use treeflat_table::{Report, ReportRequest, RequestParams, Table};

pub trait TableManipulator {
    /// Transform one table. Subtables are resolved through `loader`.
    fn manipulate_table(
        &self,
        table: Table,
        loader: &dyn SubtableLoader,
        ctx: &FetchContext<'_>,
    ) -> Result<Table>;

    /// Adjust parameters of secondary requests issued while manipulating.
    fn rewrite_subtable_request(&self, params: RequestParams) -> RequestParams {
        params
    }
}

/// Run a manipulator over every table of a report.
pub fn manipulate<M: TableManipulator + ?Sized>(
    manipulator: &M,
    report: Report,
    request: &ReportRequest,
    loader: &dyn SubtableLoader,
) -> Result<Report> {
    let rewrite = |params: RequestParams| manipulator.rewrite_subtable_request(params);
    let ctx = FetchContext::new(request, &rewrite);
    manipulate_report(manipulator, report, loader, &ctx)
}

fn manipulate_report<M: TableManipulator + ?Sized>(
    manipulator: &M,
    report: Report,
    loader: &dyn SubtableLoader,
    ctx: &FetchContext<'_>,
) -> Result<Report> {
    match report {
        Report::Table(table) => Ok(Report::Table(
            manipulator.manipulate_table(table, loader, ctx)?,
        )),
        Report::Collection(children) => {
            let mut manipulated = BTreeMap::new();
            for (key, child) in children {
                manipulated.insert(key, manipulate_report(manipulator, child, loader, ctx)?);
            }
            Ok(Report::Collection(manipulated))
        }
    }
}
