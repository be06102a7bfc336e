//! Error types for the Tradepost client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Tradepost client.
///
/// Store operations publish `to_string()` of this error into their error
/// observable and hand the typed value back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TradepostError {
    /// Transport-level failure before any response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP response with a parsed or fallback message
    #[error("API Error: {message}")]
    Api { status: u16, message: String },

    /// The server rejected the bearer token (HTTP 401)
    #[error("Unauthorized: Please log in again.")]
    AuthExpired,

    /// A client-side guard refused the operation
    #[error("{0}")]
    Precondition(String),

    /// Durable storage holds an entry that cannot be decoded
    #[error("Malformed persisted data under '{key}': {message}")]
    MalformedPersistedData { key: String, message: String },

    /// Durable storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TradepostError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Api error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a Precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Creates a MalformedPersistedData error
    pub fn malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPersistedData {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an AuthExpired error
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Check if this is a Precondition error
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// Returns the HTTP status carried by the error, if any.
    ///
    /// `AuthExpired` reports 401 so callers can branch on status uniformly.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::AuthExpired => Some(401),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TradepostError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for TradepostError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TradepostError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TradepostError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TradepostError>`.
pub type Result<T> = std::result::Result<T, TradepostError>;
