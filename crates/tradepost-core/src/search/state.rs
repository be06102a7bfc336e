use serde::{Deserialize, Serialize};

use crate::listing::Listing;

use super::filters::SearchFilterState;
use super::params::{SearchParams, derive_search_params};

/// Body of a `GET /search` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    #[serde(default)]
    pub results: Vec<Listing>,
    #[serde(default)]
    pub total: u64,
}

/// Published search state.
///
/// Invariant: `params == derive_search_params(&filters)`, and `error` is only
/// set while `results` is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    filters: SearchFilterState,
    params: SearchParams,
    pub results: Vec<Listing>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchState {
    pub fn filters(&self) -> &SearchFilterState {
        &self.filters
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Mutates the filters and re-derives the parameters.
    pub fn update_filters(&mut self, f: impl FnOnce(&mut SearchFilterState)) {
        f(&mut self.filters);
        self.params = derive_search_params(&self.filters);
    }

    pub fn apply_results(&mut self, result_set: SearchResultSet) {
        self.results = result_set.results;
        self.total = result_set.total;
        self.error = None;
    }

    pub fn apply_failure(&mut self, message: impl Into<String>) {
        self.results.clear();
        self.total = 0;
        self.error = Some(message.into());
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
        self.total = 0;
        self.error = None;
    }
}
