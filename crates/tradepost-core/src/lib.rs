//! Domain layer of the Tradepost marketplace client.
//!
//! Models for sessions, listings, conversations and search, the state
//! containers stores publish through, and the traits (`ApiTransport`,
//! `KeyValueStore`, `Navigator`, `AddressBar`) that the infrastructure crate
//! implements.

pub mod config;
pub mod error;
pub mod http;
pub mod listing;
pub mod messaging;
pub mod navigation;
pub mod search;
pub mod session;
pub mod state;
pub mod storage;
pub mod timestamp;

pub use error::{Result, TradepostError};
