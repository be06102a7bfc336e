use std::sync::Arc;

use tradepost_core::http::{ApiRequest, ApiTransport, endpoints};
use tradepost_core::messaging::{ConversationId, Message, MessagingState, NewMessage};
use tradepost_core::state::{InFlight, RequestSequencer, StateCell};
use tradepost_core::{Result, TradepostError};

use crate::unauthorized::UnauthorizedInterceptor;

/// Loads and appends to the open message thread.
pub struct MessageSync {
    transport: Arc<dyn ApiTransport>,
    interceptor: Arc<UnauthorizedInterceptor>,
    state: Arc<StateCell<MessagingState>>,
    loading: InFlight,
    sequencer: RequestSequencer,
}

impl MessageSync {
    pub(crate) fn new(
        transport: Arc<dyn ApiTransport>,
        interceptor: Arc<UnauthorizedInterceptor>,
        state: Arc<StateCell<MessagingState>>,
    ) -> Self {
        Self {
            transport,
            interceptor,
            state,
            loading: InFlight::new(),
            sequencer: RequestSequencer::new(),
        }
    }

    /// Replaces the open thread with the conversation's messages.
    ///
    /// When calls overlap only the most recent one is applied; earlier
    /// responses are returned to their callers but never published.
    pub async fn load_messages(
        &self,
        conversation_id: ConversationId,
        token: &str,
    ) -> Result<Vec<Message>> {
        let ticket = self.sequencer.next();
        let _loading = self.loading.begin(&self.state, |s| &mut s.messages_loading);
        self.state.update(|s| s.messages_error = None);

        let result = self.fetch_messages(conversation_id, token).await;

        if !self.sequencer.is_latest(ticket) {
            tracing::debug!(
                "[Messaging] Dropping stale messages response for conversation {} (request {})",
                conversation_id,
                ticket.value()
            );
            return result;
        }

        match result {
            Ok(messages) => {
                tracing::info!(
                    "[Messaging] Loaded {} messages for conversation {}",
                    messages.len(),
                    conversation_id
                );
                self.state
                    .update(|s| s.replace_messages(conversation_id, messages.clone()));
                Ok(messages)
            }
            Err(e) => Err(self.publish_error(e)),
        }
    }

    /// Posts a message and appends the stored copy to the thread and to
    /// its conversation in one published update.
    pub async fn send_message(
        &self,
        conversation_id: ConversationId,
        content: &str,
        token: &str,
    ) -> Result<Message> {
        if content.trim().is_empty() {
            return Err(self.publish_error(TradepostError::precondition(
                "Message content cannot be empty.",
            )));
        }

        let _loading = self.loading.begin(&self.state, |s| &mut s.messages_loading);
        self.state.update(|s| s.messages_error = None);

        let body = NewMessage {
            content: content.to_string(),
        };
        match self.post_message(conversation_id, &body, token).await {
            Ok(message) => {
                tracing::info!(
                    "[Messaging] Sent message {} in conversation {}",
                    message.id,
                    conversation_id
                );
                self.state.update(|s| s.apply_sent_message(message.clone()));
                Ok(message)
            }
            Err(e) => Err(self.publish_error(e)),
        }
    }

    async fn fetch_messages(
        &self,
        conversation_id: ConversationId,
        token: &str,
    ) -> Result<Vec<Message>> {
        let request =
            ApiRequest::get(endpoints::conversation_messages(conversation_id)).with_bearer(token);
        let response = self.transport.send(request).await?;
        self.interceptor.check(response)?.json()
    }

    async fn post_message(
        &self,
        conversation_id: ConversationId,
        body: &NewMessage,
        token: &str,
    ) -> Result<Message> {
        let request = ApiRequest::post(endpoints::conversation_messages(conversation_id))
            .with_bearer(token)
            .with_json(body)?;
        let response = self.transport.send(request).await?;
        self.interceptor.check(response)?.json()
    }

    fn publish_error(&self, error: TradepostError) -> TradepostError {
        tracing::warn!("[Messaging] Message operation failed: {}", error);
        let message = error.to_string();
        self.state.update(|s| s.messages_error = Some(message));
        error
    }
}
