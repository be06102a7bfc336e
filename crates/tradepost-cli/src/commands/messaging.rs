use anyhow::Result;
use tradepost_core::messaging::{Conversation, ConversationId, Message};
use tradepost_core::session::UserId;

use crate::bootstrap::App;

pub async fn inbox(app: &App) -> Result<()> {
    let token = app.require_token()?;
    let me = app.session.state().user_id();
    let conversations = app
        .messaging()
        .conversations()
        .load_conversations(&token)
        .await?;

    if conversations.is_empty() {
        println!("📭 No conversations yet");
        return Ok(());
    }
    for conversation in &conversations {
        println!("{}", conversation_line(conversation, me));
    }
    Ok(())
}

pub async fn open(app: &App, user_id: UserId) -> Result<()> {
    let token = app.require_token()?;
    let store = app.messaging();
    let conversation = store
        .conversations()
        .initiate_or_open_conversation_with_user(user_id, &token)
        .await?;

    let me = app.session.state().user_id();
    println!("💬 {}", conversation_line(&conversation, me));
    Ok(())
}

pub async fn messages(app: &App, conversation_id: ConversationId) -> Result<()> {
    let token = app.require_token()?;
    let messages = app
        .messaging()
        .messages()
        .load_messages(conversation_id, &token)
        .await?;

    let me = app.session.state().user_id();
    for message in &messages {
        println!("{}", message_line(message, me));
    }
    Ok(())
}

pub async fn send(app: &App, conversation_id: ConversationId, content: &str) -> Result<()> {
    let token = app.require_token()?;
    let message = app
        .messaging()
        .messages()
        .send_message(conversation_id, content, &token)
        .await?;

    println!("✅ Sent ({})", message.created_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}

fn conversation_line(conversation: &Conversation, me: Option<UserId>) -> String {
    let with = match me {
        Some(me) => match conversation.counterpart(me) {
            (_, Some(user)) => user.username.clone(),
            (id, None) => format!("user #{}", id),
        },
        None => "?".to_string(),
    };
    let about = conversation
        .listing
        .as_ref()
        .map(|listing| format!(" re: {}", listing.title))
        .unwrap_or_default();
    let last = conversation
        .latest_message()
        .map(|message| format!("  \"{}\"", preview(&message.content)))
        .unwrap_or_default();
    format!("#{:<5} with {}{}{}", conversation.id, with, about, last)
}

fn message_line(message: &Message, me: Option<UserId>) -> String {
    let author = if Some(message.sender_id) == me {
        "you".to_string()
    } else {
        message
            .sender
            .as_ref()
            .map(|sender| sender.username.clone())
            .unwrap_or_else(|| format!("user #{}", message.sender_id))
    };
    format!(
        "[{}] {}: {}",
        message.created_at.format("%Y-%m-%d %H:%M"),
        author,
        message.content
    )
}

fn preview(content: &str) -> String {
    const LIMIT: usize = 40;
    if content.chars().count() <= LIMIT {
        content.to_string()
    } else {
        let cut: String = content.chars().take(LIMIT).collect();
        format!("{}…", cut)
    }
}
