use std::sync::Arc;

use tradepost_core::http::{ApiRequest, ApiTransport, endpoints};
use tradepost_core::listing::ListingId;
use tradepost_core::messaging::{Conversation, ConversationCreate, ConversationId, MessagingState};
use tradepost_core::navigation::{LOGIN_ROUTE, Navigator};
use tradepost_core::session::UserId;
use tradepost_core::state::{InFlight, StateCell};
use tradepost_core::{Result, TradepostError};

use crate::session_store::SessionStore;
use crate::unauthorized::UnauthorizedInterceptor;

/// Keeps the inbox in sync with `/messages/conversations`.
pub struct ConversationSync {
    transport: Arc<dyn ApiTransport>,
    session: Arc<SessionStore>,
    interceptor: Arc<UnauthorizedInterceptor>,
    navigator: Arc<dyn Navigator>,
    state: Arc<StateCell<MessagingState>>,
    loading: InFlight,
}

impl ConversationSync {
    pub(crate) fn new(
        transport: Arc<dyn ApiTransport>,
        session: Arc<SessionStore>,
        interceptor: Arc<UnauthorizedInterceptor>,
        navigator: Arc<dyn Navigator>,
        state: Arc<StateCell<MessagingState>>,
    ) -> Self {
        Self {
            transport,
            session,
            interceptor,
            navigator,
            state,
            loading: InFlight::new(),
        }
    }

    /// Replaces the inbox with the server's list. On failure the current
    /// list is kept and the error published.
    pub async fn load_conversations(&self, token: &str) -> Result<Vec<Conversation>> {
        let _loading = self
            .loading
            .begin(&self.state, |s| &mut s.conversations_loading);
        self.state.update(|s| s.conversations_error = None);

        match self.fetch_conversations(token).await {
            Ok(conversations) => {
                tracing::info!("[Messaging] Loaded {} conversations", conversations.len());
                self.state
                    .update(|s| s.replace_conversations(conversations.clone()));
                Ok(conversations)
            }
            Err(e) => Err(self.publish_error(e)),
        }
    }

    /// Creates the conversation, or gets the existing one for this pair, and
    /// merges it into the inbox by id.
    pub async fn create_or_open_conversation(
        &self,
        user1_id: UserId,
        user2_id: UserId,
        listing_id: Option<ListingId>,
        token: &str,
    ) -> Result<Conversation> {
        let _loading = self
            .loading
            .begin(&self.state, |s| &mut s.conversations_loading);
        self.state.update(|s| s.conversations_error = None);

        let body = ConversationCreate {
            user1_id,
            user2_id,
            listing_id,
        };
        match self.post_conversation(&body, token).await {
            Ok(conversation) => {
                tracing::info!(
                    "[Messaging] Opened conversation {} between {} and {}",
                    conversation.id,
                    user1_id,
                    user2_id
                );
                self.state
                    .update(|s| s.merge_conversation(conversation.clone()));
                Ok(conversation)
            }
            Err(e) => Err(self.publish_error(e)),
        }
    }

    /// Opens a conversation between the logged-in user and `other_user_id`
    /// and makes it the active one.
    pub async fn initiate_or_open_conversation_with_user(
        &self,
        other_user_id: UserId,
        token: &str,
    ) -> Result<Conversation> {
        let Some(me) = self.session.identity() else {
            let error = self.publish_error(TradepostError::precondition(
                "Current user not available. Please log in.",
            ));
            self.navigator.push(LOGIN_ROUTE);
            return Err(error);
        };

        if me.user_id == other_user_id {
            return Err(self.publish_error(TradepostError::precondition(
                "Cannot start a conversation with yourself.",
            )));
        }

        let conversation = self
            .create_or_open_conversation(me.user_id, other_user_id, None, token)
            .await?;
        self.state
            .update(|s| s.active_conversation_id = Some(conversation.id));
        Ok(conversation)
    }

    /// Marks an already loaded conversation as active.
    pub fn select_conversation(&self, id: ConversationId) -> Result<Conversation> {
        let Some(conversation) = self.state.read(|s| s.conversation(id).cloned()) else {
            return Err(TradepostError::precondition(format!(
                "Conversation {} is not loaded.",
                id
            )));
        };
        self.state.update(|s| s.active_conversation_id = Some(id));
        Ok(conversation)
    }

    async fn fetch_conversations(&self, token: &str) -> Result<Vec<Conversation>> {
        let request = ApiRequest::get(endpoints::CONVERSATIONS).with_bearer(token);
        let response = self.transport.send(request).await?;
        self.interceptor.check(response)?.json()
    }

    async fn post_conversation(
        &self,
        body: &ConversationCreate,
        token: &str,
    ) -> Result<Conversation> {
        let request = ApiRequest::post(endpoints::CONVERSATIONS)
            .with_bearer(token)
            .with_json(body)?;
        let response = self.transport.send(request).await?;
        self.interceptor.check(response)?.json()
    }

    fn publish_error(&self, error: TradepostError) -> TradepostError {
        tracing::warn!("[Messaging] Conversation operation failed: {}", error);
        let message = error.to_string();
        self.state.update(|s| s.conversations_error = Some(message));
        error
    }
}

#[cfg(test)]
mod tests {
    use crate::messaging::MessagingStore;
    use crate::test_support::{
        ScriptedTransport, anonymous_session, json_response, logged_in_session, response,
    };
    use crate::unauthorized::UnauthorizedInterceptor;
    use serde_json::json;
    use std::sync::Arc;
    use tradepost_core::TradepostError;
    use tradepost_core::http::HttpMethod;
    use tradepost_core::session::SessionState;
    use tradepost_infrastructure::LoggingNavigator;

    fn conversation_json(id: i64, user1: i64, user2: i64) -> serde_json::Value {
        json!({
            "conversation_id": id,
            "user1_id": user1,
            "user2_id": user2,
            "listing_id": null,
            "created_at": "2024-04-01T10:00:00",
            "user1": { "user_id": user1, "username": format!("u{}", user1) },
            "user2": { "user_id": user2, "username": format!("u{}", user2) },
            "messages": []
        })
    }

    struct Fixture {
        transport: Arc<ScriptedTransport>,
        navigator: Arc<LoggingNavigator>,
        session: Arc<crate::session_store::SessionStore>,
        store: MessagingStore,
    }

    fn fixture(session: Arc<crate::session_store::SessionStore>) -> Fixture {
        let transport = ScriptedTransport::new();
        let navigator = Arc::new(LoggingNavigator::new());
        let interceptor = Arc::new(UnauthorizedInterceptor::new(
            session.clone(),
            navigator.clone(),
        ));
        let store = MessagingStore::new(
            transport.clone(),
            session.clone(),
            interceptor,
            navigator.clone(),
        );
        Fixture {
            transport,
            navigator,
            session,
            store,
        }
    }

    #[tokio::test]
    async fn test_load_replaces_list() {
        let (_, session) = logged_in_session(1, "tok");
        let f = fixture(session);
        f.transport.reply(json_response(
            200,
            json!([conversation_json(1, 1, 2), conversation_json(2, 1, 3)]),
        ));

        let loaded = f.store.conversations().load_conversations("tok").await.unwrap();

        assert_eq!(loaded.len(), 2);
        let state = f.store.state();
        assert_eq!(state.conversations.len(), 2);
        assert!(!state.conversations_loading);
        assert!(state.conversations_error.is_none());

        let request = f.transport.last_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/messages/conversations");
        assert_eq!(request.bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_load_failure_keeps_list_and_lowers_flag() {
        let (_, session) = logged_in_session(1, "tok");
        let f = fixture(session);
        f.transport.reply(json_response(200, json!([conversation_json(1, 1, 2)])));
        f.store.conversations().load_conversations("tok").await.unwrap();

        f.transport.reply(response(500, r#"{"detail":"database offline"}"#));
        let err = f.store.conversations().load_conversations("tok").await.unwrap_err();

        assert_eq!(err, TradepostError::api(500, "database offline"));
        let state = f.store.state();
        assert_eq!(state.conversations.len(), 1);
        assert_eq!(state.conversations_error.as_deref(), Some("API Error: database offline"));
        assert!(!state.conversations_loading);
    }

    #[tokio::test]
    async fn test_network_failure_lowers_flag() {
        let (_, session) = logged_in_session(1, "tok");
        let f = fixture(session);
        f.transport.fail(TradepostError::network("connection refused"));

        let result = f.store.conversations().load_conversations("tok").await;

        assert!(matches!(result, Err(TradepostError::Network(_))));
        assert!(!f.store.state().conversations_loading);
    }

    #[tokio::test]
    async fn test_repeated_create_yields_single_entry() {
        let (_, session) = logged_in_session(1, "tok");
        let f = fixture(session);
        f.transport.reply(json_response(
            200,
            json!([conversation_json(1, 1, 5), conversation_json(2, 1, 6)]),
        ));
        f.store.conversations().load_conversations("tok").await.unwrap();

        for _ in 0..3 {
            f.transport.reply(json_response(201, conversation_json(2, 1, 6)));
            f.store
                .conversations()
                .create_or_open_conversation(1, 6, None, "tok")
                .await
                .unwrap();
            let ids: Vec<_> = f.store.state().conversations.iter().map(|c| c.id).collect();
            assert_eq!(ids, vec![1, 2]);
        }

        f.transport.reply(json_response(201, conversation_json(9, 1, 7)));
        f.store
            .conversations()
            .create_or_open_conversation(1, 7, Some(40), "tok")
            .await
            .unwrap();
        let ids: Vec<_> = f.store.state().conversations.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 9]);

        let body = f.transport.last_request().body.unwrap();
        assert_eq!(body, json!({ "user1_id": 1, "user2_id": 7, "listing_id": 40 }));
    }

    #[tokio::test]
    async fn test_initiate_marks_active() {
        let (_, session) = logged_in_session(1, "tok");
        let f = fixture(session);
        f.transport.reply(json_response(201, conversation_json(3, 1, 8)));

        let conversation = f
            .store
            .conversations()
            .initiate_or_open_conversation_with_user(8, "tok")
            .await
            .unwrap();

        assert_eq!(conversation.participant_ids(), [1, 8]);
        let state = f.store.state();
        assert_eq!(state.active_conversation().map(|c| c.id), Some(3));
        assert_eq!(
            f.transport.last_request().body,
            Some(json!({ "user1_id": 1, "user2_id": 8 }))
        );
    }

    #[tokio::test]
    async fn test_initiate_without_user_navigates_to_login() {
        let f = fixture(anonymous_session());

        let err = f
            .store
            .conversations()
            .initiate_or_open_conversation_with_user(8, "tok")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Current user not available. Please log in.");
        assert_eq!(f.navigator.history(), vec!["/login"]);
        assert_eq!(
            f.store.state().conversations_error.as_deref(),
            Some("Current user not available. Please log in.")
        );
        assert!(f.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_initiate_with_self_is_refused() {
        let (_, session) = logged_in_session(4, "tok");
        let f = fixture(session);

        let err = f
            .store
            .conversations()
            .initiate_or_open_conversation_with_user(4, "tok")
            .await
            .unwrap_err();

        assert!(err.is_precondition());
        assert_eq!(err.to_string(), "Cannot start a conversation with yourself.");
        assert!(f.transport.requests().is_empty());
        assert!(f.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_create_401_tears_down_session() {
        let (_, session) = logged_in_session(1, "tok");
        let f = fixture(session);
        f.transport.reply(response(401, r#"{"detail":"expired"}"#));

        let err = f
            .store
            .conversations()
            .create_or_open_conversation(1, 2, None, "tok")
            .await
            .unwrap_err();

        assert!(err.is_auth_expired());
        assert_eq!(f.session.state(), SessionState::anonymous());
        assert_eq!(f.navigator.last_route().as_deref(), Some("/login"));
        assert_eq!(
            f.store.state().conversations_error.as_deref(),
            Some("Unauthorized: Please log in again.")
        );
    }

    #[tokio::test]
    async fn test_select_conversation() {
        let (_, session) = logged_in_session(1, "tok");
        let f = fixture(session);
        f.transport.reply(json_response(200, json!([conversation_json(5, 1, 2)])));
        f.store.conversations().load_conversations("tok").await.unwrap();

        assert!(f.store.conversations().select_conversation(6).is_err());
        let selected = f.store.conversations().select_conversation(5).unwrap();

        assert_eq!(selected.id, 5);
        assert_eq!(f.store.state().active_conversation_id, Some(5));
    }
}
