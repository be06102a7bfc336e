use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::{ListingId, ListingMinimal};
use crate::session::{UserId, UserIdentity};

pub type ConversationId = i64;
pub type MessageId = i64;

/// A single chat message. Never edited once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "message_id")]
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sender: Option<UserIdentity>,
}

/// A thread between two users, optionally about one listing.
///
/// Inbox entries from `GET /messages/conversations` carry the embedded user
/// records and `last_message` but not the id columns or the full thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "conversation_id")]
    pub id: ConversationId,
    #[serde(default)]
    pub user1_id: UserId,
    #[serde(default)]
    pub user2_id: UserId,
    #[serde(default)]
    pub listing_id: Option<ListingId>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user1: Option<UserIdentity>,
    #[serde(default)]
    pub user2: Option<UserIdentity>,
    #[serde(default)]
    pub listing: Option<ListingMinimal>,
    #[serde(default)]
    pub last_message: Option<Message>,
}

impl Conversation {
    pub fn participant_ids(&self) -> [UserId; 2] {
        [
            participant(self.user1_id, self.user1.as_ref()),
            participant(self.user2_id, self.user2.as_ref()),
        ]
    }

    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participant_ids().contains(&user_id)
    }

    /// The participant who is not `me`, with their record when embedded.
    pub fn counterpart(&self, me: UserId) -> (UserId, Option<&UserIdentity>) {
        let [first, second] = self.participant_ids();
        if first == me {
            (second, self.user2.as_ref())
        } else {
            (first, self.user1.as_ref())
        }
    }

    /// Most recent message known locally.
    pub fn latest_message(&self) -> Option<&Message> {
        self.messages.last().or(self.last_message.as_ref())
    }
}

fn participant(id: UserId, user: Option<&UserIdentity>) -> UserId {
    match user {
        Some(user) if id == 0 => user.user_id,
        _ => id,
    }
}

/// Body of `POST /messages/conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationCreate {
    pub user1_id: UserId,
    pub user2_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<ListingId>,
}

/// Body of `POST /messages/conversations/{id}/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub content: String,
}
