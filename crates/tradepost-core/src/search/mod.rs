//! Marketplace search: filter values, the request parameters derived from
//! them, and the published result set.
//!
//! Parameters are never edited directly. Every filter change goes through
//! [`SearchState::update_filters`], which re-derives them.

mod filters;
mod params;
mod state;

pub use filters::SearchFilterState;
pub use params::{SearchParams, derive_search_params, keys};
pub use state::{SearchResultSet, SearchState};
