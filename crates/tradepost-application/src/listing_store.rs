//! Listing detail view state and category lookup.

use std::sync::Arc;

use tokio::sync::watch;
use tradepost_core::Result;
use tradepost_core::http::{ApiRequest, ApiTransport, endpoints};
use tradepost_core::listing::{Category, Listing, ListingId, ListingState};
use tradepost_core::state::{InFlight, RequestSequencer, StateCell};

pub struct ListingStore {
    transport: Arc<dyn ApiTransport>,
    state: StateCell<ListingState>,
    loading: InFlight,
    sequencer: RequestSequencer,
}

impl ListingStore {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            transport,
            state: StateCell::new(ListingState::default()),
            loading: InFlight::new(),
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ListingState {
        self.state.get()
    }

    /// Loads one listing into `current`. Failure clears `current`.
    pub async fn fetch_listing_details(&self, id: ListingId) -> Result<Listing> {
        let ticket = self.sequencer.next();
        let _loading = self.loading.begin(&self.state, |s| &mut s.loading);
        self.state.update(|s| s.error = None);

        let result = self.fetch(id).await;
        if !self.sequencer.is_latest(ticket) {
            tracing::debug!("[Listing] Dropping stale response for listing {}", id);
            return result;
        }

        match &result {
            Ok(listing) => {
                tracing::info!("[Listing] Loaded listing {} '{}'", listing.id, listing.title);
                let listing = listing.clone();
                self.state.update(|s| s.current = Some(listing));
            }
            Err(e) => {
                tracing::warn!("[Listing] Failed to load listing {}: {}", id, e);
                let message = e.to_string();
                self.state.update(|s| {
                    s.current = None;
                    s.error = Some(message);
                });
            }
        }
        result
    }

    async fn fetch(&self, id: ListingId) -> Result<Listing> {
        let response = self
            .transport
            .send(ApiRequest::get(endpoints::listing(id)))
            .await?;
        response.ensure_success()?.json()
    }
}

/// `GET /categories`, optionally narrowed to skill or item categories.
pub async fn fetch_categories(
    transport: &dyn ApiTransport,
    is_skill: Option<bool>,
) -> Result<Vec<Category>> {
    let mut request = ApiRequest::get(endpoints::CATEGORIES);
    if let Some(is_skill) = is_skill {
        request = request.with_query([("is_skill", is_skill.to_string())]);
    }
    transport.send(request).await?.ensure_success()?.json()
}
