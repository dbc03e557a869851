//! Outgoing Discord messages.
//!
//! Services never call serenity directly; they go through the `Notifier` trait so the
//! poll cycle and commands can be exercised against a recording implementation.

use serenity::{
    all::{ChannelId, CreateEmbed, CreateMessage, EditMessage, GetMessages, MessageId},
    async_trait,
    http::Http,
};
use std::sync::Arc;

use crate::error::AppError;

/// Discord caps a page of channel history at 100 messages.
const HISTORY_PAGE_SIZE: usize = 100;

/// A message to send or an edit to apply.
#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub embed: Option<CreateEmbed>,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
        }
    }

    pub fn embed(embed: CreateEmbed) -> Self {
        Self {
            content: None,
            embed: Some(embed),
        }
    }

    /// Adds text shown above the embed, e.g. a user mention.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    fn into_create(self) -> CreateMessage {
        let mut message = CreateMessage::new();
        if let Some(content) = self.content {
            message = message.content(content);
        }
        if let Some(embed) = self.embed {
            message = message.embed(embed);
        }
        message
    }

    fn into_edit(self) -> EditMessage {
        let mut message = EditMessage::new();
        if let Some(content) = self.content {
            message = message.content(content);
        }
        if let Some(embed) = self.embed {
            message = message.embed(embed);
        }
        message
    }
}

/// The parts of a channel message `clear` needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMessage {
    pub id: u64,
    pub pinned: bool,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Posts a message and returns its id.
    async fn send(&self, channel_id: u64, message: OutgoingMessage) -> Result<u64, AppError>;

    /// Replaces the content and embed of an existing message.
    async fn edit(
        &self,
        channel_id: u64,
        message_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), AppError>;

    /// Lists up to `limit` of the most recent messages, newest first.
    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, AppError>;

    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<(), AppError>;
}

/// Notifier backed by serenity's HTTP client.
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, channel_id: u64, message: OutgoingMessage) -> Result<u64, AppError> {
        let sent = ChannelId::new(channel_id)
            .send_message(&self.http, message.into_create())
            .await?;

        Ok(sent.id.get())
    }

    async fn edit(
        &self,
        channel_id: u64,
        message_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), AppError> {
        self.http
            .edit_message(
                ChannelId::new(channel_id),
                MessageId::new(message_id),
                &message.into_edit(),
                vec![],
            )
            .await?;

        Ok(())
    }

    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, AppError> {
        let channel = ChannelId::new(channel_id);
        let mut collected = Vec::new();
        let mut before: Option<MessageId> = None;

        while collected.len() < limit {
            let page_size = (limit - collected.len()).min(HISTORY_PAGE_SIZE);
            let mut request = GetMessages::new().limit(page_size as u8);
            if let Some(before) = before {
                request = request.before(before);
            }

            let page = channel.messages(&self.http, request).await?;
            let Some(oldest) = page.last() else {
                break;
            };
            before = Some(oldest.id);

            let exhausted = page.len() < page_size;
            collected.extend(page.iter().map(|message| ChannelMessage {
                id: message.id.get(),
                pinned: message.pinned,
            }));
            if exhausted {
                break;
            }
        }

        Ok(collected)
    }

    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<(), AppError> {
        self.http
            .delete_message(ChannelId::new(channel_id), MessageId::new(message_id), None)
            .await?;

        Ok(())
    }
}

/// Picks the messages `clear` may delete.
///
/// Pinned messages and the persistent embeds are always kept.
///
/// # Arguments
/// - `messages` - Recent channel messages
/// - `keep` - Message ids of the persistent embeds
pub fn select_deletable(messages: &[ChannelMessage], keep: &[u64]) -> Vec<u64> {
    messages
        .iter()
        .filter(|message| !message.pinned && !keep.contains(&message.id))
        .map(|message| message.id)
        .collect()
}
