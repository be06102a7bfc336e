//! API paths, relative to the `/api` base.

use crate::listing::ListingId;
use crate::messaging::ConversationId;

pub const SEARCH: &str = "/search";
pub const CATEGORIES: &str = "/categories";
pub const CONVERSATIONS: &str = "/messages/conversations";
pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_ME: &str = "/auth/me";

pub fn listing(id: ListingId) -> String {
    format!("/listings/{}", id)
}

pub fn conversation_messages(id: ConversationId) -> String {
    format!("{}/{}/messages", CONVERSATIONS, id)
}
