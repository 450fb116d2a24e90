//! Transcript data model
//!
//! These types carry no UI or transport concerns; the conversation owns them
//! and the renderer only reads them.

use std::fmt;

/// Unique message token. Allocated in creation order, so comparing two ids
/// tells which message was created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    pub fn first() -> Self {
        Self(1)
    }

    /// The id allocated right after this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    /// For bot messages, the user message whose request produced this reply
    pub reply_to: Option<MessageId>,
}

impl Message {
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            reply_to: None,
        }
    }

    pub fn bot(id: MessageId, text: impl Into<String>, reply_to: MessageId) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Bot,
            reply_to: Some(reply_to),
        }
    }
}
