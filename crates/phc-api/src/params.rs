//! Query parameters shared by the API endpoints.

use std::collections::BTreeMap;

/// Open key-value bag of query parameters.
///
/// Recognized keys have typed setters; anything else can be set with
/// [`ApiParams::with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiParams {
    values: BTreeMap<String, String>,
}

impl ApiParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    pub fn top_n(self, n: usize) -> Self {
        self.with("top_n", n)
    }

    pub fn state(self, state: impl Into<String>) -> Self {
        self.with("state", state.into())
    }

    pub fn min_score(self, score: f64) -> Self {
        self.with("min_score", score)
    }

    pub fn limit(self, limit: usize) -> Self {
        self.with("limit", limit)
    }

    pub fn offset(self, offset: usize) -> Self {
        self.with("offset", offset)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The requested ranking size, if set and valid.
    pub fn requested_top_n(&self) -> Option<usize> {
        self.get("top_n")?.parse().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pairs in key order, ready for `RequestBuilder::query`.
    pub fn to_query(&self) -> Vec<(&str, &str)> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
