//! Transport-neutral HTTP request/response types.
//!
//! Stores build an [`ApiRequest`], hand it to an [`ApiTransport`], and judge
//! the returned [`ApiResponse`] themselves. Only a transport failure (no
//! response at all) is an error at this layer; every status code comes back
//! as a response.

pub mod endpoints;
mod response;

pub use response::ApiResponse;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A request against the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the API base, starting with `/`.
    pub path: String,
    /// Query pairs in the order they must appear on the wire.
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds `Authorization: Bearer {token}`.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Sends one request and returns whatever response the server produced.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// # Errors
    ///
    /// `TradepostError::Network` when no response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_collects_parts() {
        let request = ApiRequest::post("/messages/conversations")
            .with_bearer("tok")
            .with_json(&json!({ "user1_id": 1, "user2_id": 2 }))
            .unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.bearer.as_deref(), Some("tok"));
        assert_eq!(request.body, Some(json!({ "user1_id": 1, "user2_id": 2 })));
    }

    #[test]
    fn test_query_preserves_order() {
        let request = ApiRequest::get("/search").with_query([("q", "desk"), ("category_id", "2")]);
        assert_eq!(
            request.query,
            vec![
                ("q".to_string(), "desk".to_string()),
                ("category_id".to_string(), "2".to_string())
            ]
        );
    }
}
