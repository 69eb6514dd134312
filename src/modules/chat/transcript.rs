// src/modules/chat/transcript.rs
//! Append-only conversation transcript.
//!
//! The first entry is always the system message given at construction. Entries
//! are only ever appended; there is no way to edit or remove one. The whole
//! sequence is sent verbatim with every completion call, so it grows without
//! bound for the lifetime of a session.

use serde::Serialize;

use super::message::Message;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::new_system(system_prompt)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new_user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new_assistant(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true: the system message is always present.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    /// A fresh transcript with the same system message.
    pub fn restarted(&self) -> Self {
        Self::new(self.system_prompt().to_string())
    }
}
