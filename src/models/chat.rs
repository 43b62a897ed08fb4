//! Listener chat messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque store-assigned chat message identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        MessageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chat message as stored. Flagged messages stay visible to listeners but
/// are surfaced in the moderation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub name: String,
    pub text: String,
    /// Client IP the message arrived from; shown only to moderators.
    pub ip: String,
    pub ts: DateTime<Utc>,
    pub flagged: bool,
}

/// Fields for a new message; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageDraft {
    pub name: String,
    pub text: String,
    pub ip: String,
    pub ts: DateTime<Utc>,
    pub flagged: bool,
}
