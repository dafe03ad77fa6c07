//! Request parameters consumed by the flatten pass and its secondary fetches.

use treeflat_table::{ReportRequest, RequestParams, SubtableId};

/// Asks for the report to be flattened
pub const FLAT_PARAM: &str = "flat";
/// Asks for interior rows to be kept in flattened output
pub const INCLUDE_AGGREGATE_ROWS_PARAM: &str = "include_aggregate_rows";
/// Selects the subtable a secondary request should return
pub const SUBTABLE_ID_PARAM: &str = "idSubtable";

pub fn is_flatten_requested(params: &RequestParams) -> bool {
    params.is_enabled(FLAT_PARAM)
}

/// Drop the `flat` directive, passing every other parameter through.
///
/// Applied to every secondary fetch issued during a flatten pass: a
/// flattened child would be concatenated a second time.
pub fn strip_flatten_directive(mut params: RequestParams) -> RequestParams {
    params.remove(FLAT_PARAM);
    params
}

/// What a loader needs to derive a secondary request for a subtable.
pub struct FetchContext<'a> {
    request: &'a ReportRequest,
    rewrite: &'a dyn Fn(RequestParams) -> RequestParams,
}

impl<'a> FetchContext<'a> {
    pub fn new(
        request: &'a ReportRequest,
        rewrite: &'a dyn Fn(RequestParams) -> RequestParams,
    ) -> Self {
        Self { request, rewrite }
    }

    /// The request that produced the parent table
    pub fn parent_request(&self) -> &ReportRequest {
        self.request
    }

    /// The parent request narrowed to one subtable, with the manipulator's
    /// rewrite applied.
    pub fn subtable_request(&self, id: SubtableId) -> ReportRequest {
        let params = self
            .request
            .params
            .clone()
            .with(SUBTABLE_ID_PARAM, id.to_string());
        ReportRequest {
            module: self.request.module.clone(),
            method: self.request.method.clone(),
            params: (self.rewrite)(params),
        }
    }
}
