//! Shared fixtures for store unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;
use tradepost_core::http::{ApiRequest, ApiResponse, ApiTransport};
use tradepost_core::session::{SessionPayload, UserIdentity};
use tradepost_core::storage::{KeyValueStore, StorageKeys};
use tradepost_core::{Result, TradepostError};
use tradepost_infrastructure::InMemoryKeyValueStore;

use crate::session_store::SessionStore;

pub fn identity(user_id: i64, username: &str) -> UserIdentity {
    serde_json::from_value(serde_json::json!({
        "user_id": user_id,
        "username": username,
        "email": format!("{}@campus.edu", username),
    }))
    .unwrap()
}

pub fn response(status: u16, body: &str) -> ApiResponse {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    };
    ApiResponse::new(status, reason, body.as_bytes().to_vec())
}

pub fn json_response(status: u16, body: Value) -> ApiResponse {
    response(status, &body.to_string())
}

pub fn logged_in_session(
    user_id: i64,
    token: &str,
) -> (Arc<InMemoryKeyValueStore>, Arc<SessionStore>) {
    let storage = Arc::new(InMemoryKeyValueStore::new());
    let session = Arc::new(SessionStore::new(storage.clone(), StorageKeys::default()));
    session
        .set_session(Some(SessionPayload::new(identity(user_id, "me"), token)))
        .unwrap();
    (storage, session)
}

pub fn anonymous_session() -> Arc<SessionStore> {
    Arc::new(SessionStore::new(
        Arc::new(InMemoryKeyValueStore::new()),
        StorageKeys::default(),
    ))
}

/// Storage whose every call fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(TradepostError::storage("disk unavailable"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(TradepostError::storage("disk unavailable"))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(TradepostError::storage("disk unavailable"))
    }
}

enum Reply {
    Ready(Result<ApiResponse>),
    Deferred(oneshot::Receiver<Result<ApiResponse>>),
}

/// Transport that answers from a queue and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, response: ApiResponse) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Ok(response)));
    }

    pub fn fail(&self, error: TradepostError) {
        self.replies.lock().unwrap().push_back(Reply::Ready(Err(error)));
    }

    /// Queues a reply that is only delivered once the returned sender fires.
    pub fn defer(&self) -> oneshot::Sender<Result<ApiResponse>> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Deferred(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request: no scripted reply left");

        match reply {
            Reply::Ready(result) => result,
            Reply::Deferred(rx) => rx
                .await
                .unwrap_or_else(|_| Err(TradepostError::network("deferred reply dropped"))),
        }
    }
}
