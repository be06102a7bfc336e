//! Conversation and message synchronization.
//!
//! [`ConversationSync`] and [`MessageSync`] publish into one shared
//! `MessagingState` cell, so views observing the inbox and the open thread
//! always see both sides of a sent message together.

mod conversation_sync;
mod message_sync;

pub use conversation_sync::ConversationSync;
pub use message_sync::MessageSync;

use std::sync::Arc;

use tokio::sync::watch;
use tradepost_core::http::ApiTransport;
use tradepost_core::messaging::MessagingState;
use tradepost_core::navigation::Navigator;
use tradepost_core::state::StateCell;

use crate::session_store::SessionStore;
use crate::unauthorized::UnauthorizedInterceptor;

/// Owns the messaging state and both synchronizers that write to it.
pub struct MessagingStore {
    state: Arc<StateCell<MessagingState>>,
    conversations: ConversationSync,
    messages: MessageSync,
}

impl MessagingStore {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        session: Arc<SessionStore>,
        interceptor: Arc<UnauthorizedInterceptor>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let state = Arc::new(StateCell::new(MessagingState::default()));
        Self {
            conversations: ConversationSync::new(
                transport.clone(),
                session,
                interceptor.clone(),
                navigator,
                state.clone(),
            ),
            messages: MessageSync::new(transport, interceptor, state.clone()),
            state,
        }
    }

    pub fn conversations(&self) -> &ConversationSync {
        &self.conversations
    }

    pub fn messages(&self) -> &MessageSync {
        &self.messages
    }

    pub fn subscribe(&self) -> watch::Receiver<MessagingState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> MessagingState {
        self.state.get()
    }
}
