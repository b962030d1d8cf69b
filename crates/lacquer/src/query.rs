//! Opaque query parameters threaded through to repository methods.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw request parameters, passed through to repository methods verbatim.
///
/// The adapter layer never interprets these; filtering, sorting and paging
/// semantics belong to the repository (or to layers above it). Keys map to
/// one or more raw values, in insertion-independent order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// An empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.entry(key.into()).or_default().push(value.into());
    }

    /// The raw values recorded under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.params.get(key).map(Vec::as_slice)
    }

    /// Whether no parameters were recorded.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over keys and their raw values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
