use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, TradepostError};

/// A fully received HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Status line reason phrase, e.g. "Not Found".
    pub reason: String,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| TradepostError::Serialization {
            format: "JSON".to_string(),
            message: format!("HTTP {} response body: {}", self.status, e),
        })
    }

    /// Human-readable failure message for a non-success response.
    ///
    /// Prefers the JSON body's `detail` (a string, or the `msg` entries of a
    /// validation error list), then `message`, then the reason phrase.
    pub fn error_message(&self) -> String {
        serde_json::from_slice::<Value>(&self.body)
            .ok()
            .and_then(|body| message_from_body(&body))
            .unwrap_or_else(|| self.status_text())
    }

    /// Converts a non-success response into `TradepostError::Api`.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TradepostError::api(self.status, self.error_message()))
        }
    }

    fn status_text(&self) -> String {
        if self.reason.trim().is_empty() {
            format!("HTTP {}", self.status)
        } else {
            self.reason.clone()
        }
    }
}

fn message_from_body(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return Some(detail.clone()),
        Some(Value::Array(entries)) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
