//! Stores that keep the client's view of the marketplace in sync with the
//! API: session, conversations, messages, search and listing details.
//!
//! Every store publishes its state through a `tokio::sync::watch` channel;
//! front ends subscribe and call the named operations, never mutating state
//! themselves.

pub mod auth_service;
pub mod listing_store;
pub mod messaging;
pub mod search_engine;
pub mod session_store;
pub mod unauthorized;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_service::AuthService;
pub use listing_store::{ListingStore, fetch_categories};
pub use messaging::{ConversationSync, MessageSync, MessagingStore};
pub use search_engine::SearchFilterEngine;
pub use session_store::SessionStore;
pub use unauthorized::UnauthorizedInterceptor;
