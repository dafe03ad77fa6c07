//! Report request identity and parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String parameters of a report request (`flat`, `idSubtable`, `period`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// True when the flag is set to `1` or `true`.
    pub fn is_enabled(&self, key: &str) -> bool {
        matches!(self.get(key).map(str::trim), Some("1") | Some("true"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The report a table was produced for: `module.method` plus parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub module: String,
    pub method: String,
    #[serde(default)]
    pub params: RequestParams,
}

impl ReportRequest {
    pub fn new(module: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            method: method.into(),
            params: RequestParams::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.set(key, value);
        self
    }

    /// `Module.method`, as report identifiers are usually written
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_enabled() {
        let params = RequestParams::new()
            .with("flat", "1")
            .with("expanded", "true")
            .with("disabled", "0");
        assert!(params.is_enabled("flat"));
        assert!(params.is_enabled("expanded"));
        assert!(!params.is_enabled("disabled"));
        assert!(!params.is_enabled("missing"));
    }

    #[test]
    fn test_remove_leaves_other_params() {
        let mut params: RequestParams = [("flat", "1"), ("period", "day")].into_iter().collect();
        assert_eq!(params.remove("flat").as_deref(), Some("1"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("period"), Some("day"));
    }

    #[test]
    fn test_qualified_name() {
        let request = ReportRequest::new("Actions", "getPageUrls").with_param("flat", "1");
        assert_eq!(request.qualified_name(), "Actions.getPageUrls");
        assert!(request.params.is_enabled("flat"));
    }
}
