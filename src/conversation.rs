//! Conversation controller
//!
//! Owns the transcript and the unsent input buffer. The only ways to change
//! either are the methods below; the renderer gets read-only access through
//! [`Conversation::messages`] and [`Conversation::input`].
//!
//! Requests run on spawned tasks. They never touch this struct: each task
//! sends a [`Resolution`] back over a channel and the event loop applies it
//! with [`Conversation::resolve`] on the thread that owns the state.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::client::{ClientError, Responder};
use crate::message::{Message, MessageId};

/// Outcome of one request, tagged with the user message that started it
#[derive(Debug)]
pub struct Resolution {
    pub reply_to: MessageId,
    pub outcome: Result<String, ClientError>,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct Conversation {
    transcript: Vec<Message>,
    input: String,
    cursor: usize, // char position in input
    next_id: MessageId,
    in_flight: usize,
    last_failure: Option<String>,
    responder: Arc<dyn Responder>,
    replies: mpsc::UnboundedSender<Resolution>,
}

impl Conversation {
    pub fn new(responder: Arc<dyn Responder>, replies: mpsc::UnboundedSender<Resolution>) -> Self {
        Self {
            transcript: Vec::new(),
            input: String::new(),
            cursor: 0,
            next_id: MessageId::first(),
            in_flight: 0,
            last_failure: None,
            responder,
            replies,
        }
    }

    /// Transcript in insertion order. Call again to restart.
    pub fn messages(&self) -> std::slice::Iter<'_, Message> {
        self.transcript.iter()
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Requests sent but not yet resolved
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Replace the input buffer wholesale
    pub fn update_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.cursor = self.input.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Insert pasted text at the cursor. Line breaks become spaces since
    /// the buffer is a single line.
    pub fn insert_str(&mut self, text: &str) {
        let pasted: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert_str(byte_pos, &pasted);
        self.cursor += pasted.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Submit the current buffer.
    ///
    /// The buffer is always cleared. Blank text stops there. Otherwise the
    /// user message is appended before the request task is spawned, and its
    /// id is returned.
    pub fn submit(&mut self) -> Option<MessageId> {
        let text = std::mem::take(&mut self.input);
        self.cursor = 0;

        if text.trim().is_empty() {
            return None;
        }

        let id = self.allocate_id();
        self.transcript.push(Message::user(id, text.clone()));
        self.in_flight += 1;
        tracing::debug!(id = %id, "question submitted");

        let responder = Arc::clone(&self.responder);
        let replies = self.replies.clone();
        tokio::spawn(async move {
            let outcome = responder.ask(&text).await;
            // Receiver gone means the session ended; nothing left to update
            let _ = replies.send(Resolution {
                reply_to: id,
                outcome,
            });
        });

        Some(id)
    }

    /// Apply a finished request. Returns the bot message id on success.
    pub fn resolve(&mut self, resolution: Resolution) -> Option<MessageId> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match resolution.outcome {
            Ok(reply) => {
                let id = self.allocate_id();
                self.transcript
                    .push(Message::bot(id, reply, resolution.reply_to));
                self.last_failure = None;
                tracing::debug!(id = %id, reply_to = %resolution.reply_to, "reply received");
                Some(id)
            }
            Err(e) => {
                tracing::warn!(reply_to = %resolution.reply_to, error = %e, "question request failed");
                self.last_failure = Some(e.to_string());
                None
            }
        }
    }
}
