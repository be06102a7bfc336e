use super::model::{Conversation, ConversationId, Message};

/// Everything the messaging views observe, published as one value.
///
/// Conversations and the open thread share a container so a sent message
/// lands in both lists within a single published version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagingState {
    /// Inbox, in server order; ids are unique.
    pub conversations: Vec<Conversation>,
    pub conversations_loading: bool,
    pub conversations_error: Option<String>,
    pub active_conversation_id: Option<ConversationId>,
    /// The open thread, oldest first.
    pub messages: Vec<Message>,
    /// Conversation that `messages` belongs to.
    pub messages_conversation_id: Option<ConversationId>,
    pub messages_loading: bool,
    pub messages_error: Option<String>,
}

impl MessagingState {
    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_conversation_id.and_then(|id| self.conversation(id))
    }

    pub fn replace_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
        self.conversations_error = None;
    }

    /// Id-keyed upsert: an existing entry is replaced where it stands,
    /// otherwise the conversation is appended.
    pub fn merge_conversation(&mut self, conversation: Conversation) {
        match self.conversations.iter_mut().find(|c| c.id == conversation.id) {
            Some(existing) => *existing = conversation,
            None => self.conversations.push(conversation),
        }
    }

    pub fn replace_messages(&mut self, conversation_id: ConversationId, messages: Vec<Message>) {
        self.messages = messages;
        self.messages_conversation_id = Some(conversation_id);
        self.messages_error = None;
    }

    /// Appends a server-confirmed message to the flat thread and to its
    /// conversation's embedded sequence, bumping `updated_at`.
    ///
    /// A message id already present in either list is not added twice.
    pub fn apply_sent_message(&mut self, message: Message) {
        let conversation_id = message.conversation_id;

        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            if !conversation.messages.iter().any(|m| m.id == message.id) {
                conversation.messages.push(message.clone());
            }
            conversation.updated_at = Some(message.created_at);
        }

        if self.messages_conversation_id.is_none() {
            self.messages_conversation_id = Some(conversation_id);
        }
        if !self.messages.iter().any(|m| m.id == message.id) {
            self.messages.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn conversation(id: ConversationId, title: &str) -> Conversation {
        Conversation {
            id,
            user1_id: 1,
            user2_id: 2,
            listing_id: None,
            messages: Vec::new(),
            created_at: None,
            updated_at: None,
            user1: None,
            user2: None,
            listing: Some(crate::listing::ListingMinimal {
                id: 100 + id,
                title: title.to_string(),
                is_skill_sharing: false,
            }),
            last_message: None,
        }
    }

    fn message(id: i64, conversation_id: ConversationId, minute: u32) -> Message {
        Message {
            id,
            conversation_id,
            sender_id: 1,
            content: format!("message {}", id),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
            sender: None,
        }
    }

    #[test]
    fn test_merge_replaces_in_place() {
        let mut state = MessagingState::default();
        state.replace_conversations(vec![
            conversation(1, "a"),
            conversation(2, "b"),
            conversation(3, "c"),
        ]);

        state.merge_conversation(conversation(2, "b2"));

        let ids: Vec<_> = state.conversations.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let title = state
            .conversation(2)
            .and_then(|c| c.listing.as_ref())
            .map(|l| l.title.as_str());
        assert_eq!(title, Some("b2"));
    }

    #[test]
    fn test_merge_appends_new_id_once() {
        let mut state = MessagingState::default();
        state.merge_conversation(conversation(5, "x"));
        state.merge_conversation(conversation(5, "x"));
        state.merge_conversation(conversation(5, "x"));

        assert_eq!(state.conversations.iter().filter(|c| c.id == 5).count(), 1);
    }

    #[test]
    fn test_sent_message_lands_in_both_lists() {
        let mut state = MessagingState::default();
        state.replace_conversations(vec![conversation(1, "a"), conversation(2, "b")]);
        state.replace_messages(2, vec![message(10, 2, 0)]);

        state.apply_sent_message(message(11, 2, 5));
        state.apply_sent_message(message(12, 2, 6));

        let flat: Vec<_> = state.messages.iter().map(|m| m.id).collect();
        assert_eq!(flat, vec![10, 11, 12]);

        let embedded = state.conversation(2).unwrap();
        let ids: Vec<_> = embedded.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![11, 12]);
        assert_eq!(
            embedded.updated_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 6, 0).unwrap())
        );
        assert!(state.conversation(1).unwrap().messages.is_empty());
    }

    #[test]
    fn test_sent_message_is_not_duplicated() {
        let mut state = MessagingState::default();
        state.replace_conversations(vec![conversation(3, "c")]);
        state.replace_messages(3, Vec::new());

        state.apply_sent_message(message(20, 3, 1));
        state.apply_sent_message(message(20, 3, 1));

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.conversation(3).unwrap().messages.len(), 1);
    }

    #[test]
    fn test_send_into_other_conversation_reaches_flat_list() {
        let mut state = MessagingState::default();
        state.replace_conversations(vec![conversation(1, "a"), conversation(2, "b")]);
        state.replace_messages(1, vec![message(1, 1, 0)]);

        state.apply_sent_message(message(99, 2, 3));

        let flat: Vec<_> = state.messages.iter().map(|m| m.id).collect();
        assert_eq!(flat, vec![1, 99]);
        assert_eq!(state.conversation(2).unwrap().messages.len(), 1);
        assert!(state.conversation(1).unwrap().messages.is_empty());
    }

    #[test]
    fn test_active_conversation_lookup() {
        let mut state = MessagingState::default();
        state.replace_conversations(vec![conversation(7, "g")]);
        assert!(state.active_conversation().is_none());

        state.active_conversation_id = Some(7);
        assert_eq!(state.active_conversation().map(|c| c.id), Some(7));
    }
}
