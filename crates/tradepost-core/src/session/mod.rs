//! Session domain module.
//!
//! # Usage
//!
//! ```ignore
//! use tradepost_core::session::{SessionPayload, SessionState, UserIdentity};
//! ```

mod auth;
mod model;

pub use auth::{LoginRequest, TokenResponse};
pub use model::{SessionPayload, SessionState, UserId, UserIdentity};
