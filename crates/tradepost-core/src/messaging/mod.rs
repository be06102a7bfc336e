//! Conversations and messages between marketplace users.

mod model;
mod state;

pub use model::{Conversation, ConversationCreate, ConversationId, Message, MessageId, NewMessage};
pub use state::MessagingState;
