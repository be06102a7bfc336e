//! Search filters, derived request parameters and result fetching.

use std::sync::Arc;

use tokio::sync::watch;
use tradepost_core::Result;
use tradepost_core::http::{ApiRequest, ApiTransport, endpoints};
use tradepost_core::listing::CategoryId;
use tradepost_core::navigation::AddressBar;
use tradepost_core::search::{SearchFilterState, SearchParams, SearchResultSet, SearchState};
use tradepost_core::state::{InFlight, RequestSequencer, StateCell};

/// Owns the search filters and results.
///
/// Each setter publishes the new filters together with their re-derived
/// parameters. Nothing is fetched until one of the search operations runs.
pub struct SearchFilterEngine {
    transport: Arc<dyn ApiTransport>,
    address_bar: Arc<dyn AddressBar>,
    state: StateCell<SearchState>,
    loading: InFlight,
    sequencer: RequestSequencer,
}

impl SearchFilterEngine {
    pub fn new(transport: Arc<dyn ApiTransport>, address_bar: Arc<dyn AddressBar>) -> Self {
        Self {
            transport,
            address_bar,
            state: StateCell::new(SearchState::default()),
            loading: InFlight::new(),
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.get()
    }

    pub fn params(&self) -> SearchParams {
        self.state.read(|s| s.params().clone())
    }

    pub fn update_filters(&self, f: impl FnOnce(&mut SearchFilterState)) {
        self.state.update(|s| s.update_filters(f));
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update_filters(|f| f.query = query);
    }

    pub fn set_category(&self, category_id: CategoryId) {
        self.update_filters(|f| f.category_id = category_id);
    }

    pub fn set_condition(&self, condition: impl Into<String>) {
        let condition = condition.into();
        self.update_filters(|f| f.condition = condition);
    }

    pub fn set_min_price(&self, min_price: impl Into<String>) {
        let min_price = min_price.into();
        self.update_filters(|f| f.min_price = min_price);
    }

    pub fn set_max_price(&self, max_price: impl Into<String>) {
        let max_price = max_price.into();
        self.update_filters(|f| f.max_price = max_price);
    }

    pub fn set_skill_context(&self, skill_context: Option<bool>) {
        self.update_filters(|f| f.skill_context = skill_context);
    }

    /// Runs `GET /search` with the current parameters.
    ///
    /// Success replaces the result set and, when `update_url`, rewrites the
    /// address bar in place. Failure empties the results and publishes the
    /// error. Superseded calls return their own outcome without touching
    /// state.
    pub async fn perform_search(&self, update_url: bool) -> Result<SearchResultSet> {
        let params = self.params();
        let ticket = self.sequencer.next();
        let _loading = self.loading.begin(&self.state, |s| &mut s.loading);
        self.state.update(|s| s.error = None);

        tracing::debug!("[Search] Searching with '{}'", params);
        let result = self.fetch(&params).await;

        if !self.sequencer.is_latest(ticket) {
            tracing::debug!("[Search] Dropping stale response for request {}", ticket.value());
            return result;
        }

        match result {
            Ok(result_set) => {
                tracing::info!(
                    "[Search] {} results (total {})",
                    result_set.results.len(),
                    result_set.total
                );
                self.state.update(|s| s.apply_results(result_set.clone()));
                if update_url {
                    self.address_bar.replace_query(&params.to_query_string());
                }
                Ok(result_set)
            }
            Err(e) => {
                tracing::warn!("[Search] Search failed: {}", e);
                let message = e.to_string();
                self.state.update(|s| s.apply_failure(message));
                Err(e)
            }
        }
    }

    /// Switches between skills and items with every other filter reset.
    ///
    /// Old results are cleared before the new search starts; the address
    /// bar is left alone.
    pub async fn reset_search_context(&self, skill_context: bool) -> Result<SearchResultSet> {
        tracing::info!(
            "[Search] Resetting context to {}",
            if skill_context { "skills" } else { "items" }
        );
        self.state.update(|s| {
            s.update_filters(|f| f.reset_for_context(skill_context));
            s.clear_results();
        });
        self.perform_search(false).await
    }

    /// Clears the user's filters but keeps the context, then searches and
    /// updates the address bar.
    pub async fn clear_active_filters(&self) -> Result<SearchResultSet> {
        self.update_filters(SearchFilterState::clear_active);
        self.perform_search(true).await
    }

    /// Hydrates filters from the address bar.
    ///
    /// Returns `Ok(None)` when the query string only carries the context
    /// flag (or nothing), since the current results already match.
    pub async fn apply_url_filters(&self) -> Result<Option<SearchResultSet>> {
        let params = SearchParams::parse(&self.address_bar.query());
        self.update_filters(|f| f.hydrate_from(&params));

        if !SearchFilterState::hydration_needs_search(&params) {
            tracing::debug!("[Search] No URL filters to apply");
            return Ok(None);
        }

        tracing::info!("[Search] Applying URL filters '{}'", params);
        self.perform_search(false).await.map(Some)
    }

    async fn fetch(&self, params: &SearchParams) -> Result<SearchResultSet> {
        let request = ApiRequest::get(endpoints::SEARCH).with_query(params.iter());
        let response = self.transport.send(request).await?;
        response.ensure_success()?.json()
    }
}
