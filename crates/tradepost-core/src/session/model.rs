//! Session domain model.
//!
//! The session is the authenticated identity plus its bearer token. The token
//! alone decides whether a user is logged in; an identity without a token is
//! never considered valid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
pub type UserId = i64;

/// The logged-in user as returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Input to `SessionStore::set_session`.
///
/// Mirrors the login payload: the user's fields with the token alongside.
/// A payload without a token logs the user out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(flatten)]
    pub identity: UserIdentity,
    #[serde(default)]
    pub token: Option<String>,
}

impl SessionPayload {
    pub fn new(identity: UserIdentity, token: impl Into<String>) -> Self {
        Self {
            identity,
            token: Some(token.into()),
        }
    }
}

/// Published session state.
///
/// Invariant: `authenticated == token.is_some()`, and `identity` is only set
/// while a token is present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub identity: Option<UserIdentity>,
    pub token: Option<String>,
    pub authenticated: bool,
}

impl SessionState {
    /// State with nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Option<UserIdentity>, token: String) -> Self {
        Self {
            identity,
            token: Some(token),
            authenticated: true,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity.as_ref().map(|identity| identity.user_id)
    }
}
