//! Conversation log and its terminal projection.

use pagechat_common::Sender;
use serde::{Deserialize, Serialize};

/// Text shown in the bot slot while an answer is outstanding.
pub const THINKING_PLACEHOLDER: &str = "Thinking...";

/// One entry of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    /// Only a pending message may still change.
    pub pending: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            pending: false,
        }
    }

    /// The "Thinking..." slot that is later replaced by the answer.
    pub fn pending_bot() -> Self {
        Self {
            text: THINKING_PLACEHOLDER.to_string(),
            sender: Sender::Bot,
            pending: true,
        }
    }

    pub fn is_pending_bot(&self) -> bool {
        self.sender == Sender::Bot && self.pending
    }
}

/// A change the front end has not drawn yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationUpdate {
    Appended(usize),
    Replaced(usize),
}

/// Append-only message log with in-place resolution of pending entries.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    updates: Vec<ConversationUpdate>,
    scroll_anchor: Option<usize>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and scroll to it. Returns its index.
    pub fn append(&mut self, message: Message) -> usize {
        let index = self.messages.len();
        self.messages.push(message);
        self.touch(ConversationUpdate::Appended(index));
        index
    }

    /// Resolve the newest pending message matching `predicate`.
    ///
    /// The target's text becomes `text` and it stops being pending, so a
    /// second call with the same predicate finds nothing. Returns the
    /// index that was replaced.
    pub fn mutate_last<P>(&mut self, predicate: P, text: impl Into<String>) -> Option<usize>
    where
        P: Fn(&Message) -> bool,
    {
        let index = self
            .messages
            .iter()
            .rposition(|m| m.pending && predicate(m))?;
        let message = &mut self.messages[index];
        message.text = text.into();
        message.pending = false;
        self.touch(ConversationUpdate::Replaced(index));
        Some(index)
    }

    fn touch(&mut self, update: ConversationUpdate) {
        self.updates.push(update);
        self.scroll_anchor = self.messages.len().checked_sub(1);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.pending).count()
    }

    /// Index the view is scrolled to (always the newest entry).
    pub fn scroll_anchor(&self) -> Option<usize> {
        self.scroll_anchor
    }

    /// Take all changes since the last drain.
    pub fn drain_updates(&mut self) -> Vec<ConversationUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Render one message as a terminal line.
    pub fn render_message(message: &Message) -> String {
        match message.sender {
            Sender::User => format!("You: {}", message.text),
            Sender::Bot => format!("Bot: {}", message.text),
        }
    }

    /// Pure projection of the whole log.
    pub fn render_lines(&self) -> Vec<String> {
        self.messages.iter().map(Self::render_message).collect()
    }
}
