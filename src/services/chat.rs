//! Moderated listener chat.
//!
//! Posting is rate-limited per client IP against a sliding window backed by
//! the store, so the limit holds across server restarts and replicas.
//! Messages containing a configured bad word are stored flagged rather than
//! rejected; moderators review them in the moderation listing.

use chrono::{DateTime, Duration, Utc};

use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{require_field, ChatMessage, ChatMessageDraft, MessageId, ValidationError};

/// Display name used when the sender leaves the name blank.
pub const ANON_NAME: &str = "Anon";
/// Longest accepted display name, in characters.
pub const MAX_NAME_CHARS: usize = 60;
/// Longest accepted message body, in characters.
pub const MAX_TEXT_CHARS: usize = 500;

/// Tunable chat behavior.
#[derive(Debug, Clone)]
pub struct ChatPolicy {
    /// Messages allowed per IP within one window.
    pub max_msgs: u64,
    /// Sliding window length in seconds.
    pub window_seconds: i64,
    /// Lowercased substrings that flag a message for moderation.
    pub bad_words: Vec<String>,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            max_msgs: 10,
            window_seconds: 60,
            bad_words: Vec::new(),
        }
    }
}

impl ChatPolicy {
    /// Read tuning overrides from the environment.
    ///
    /// `CHAT_RATE_MAX_MSGS`, `CHAT_RATE_WINDOW_SECONDS` and `CHAT_BAD_WORDS`
    /// (comma-separated) override the defaults; anything unset or unparsable
    /// keeps its default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_msgs = std::env::var("CHAT_RATE_MAX_MSGS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.max_msgs);
        let window_seconds = std::env::var("CHAT_RATE_WINDOW_SECONDS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(defaults.window_seconds);
        let bad_words = std::env::var("CHAT_BAD_WORDS")
            .map(|v| parse_bad_words(&v))
            .unwrap_or_default();

        Self {
            max_msgs,
            window_seconds,
            bad_words,
        }
    }
}

/// Split a comma-separated bad-word list, lowercased, blanks dropped.
pub fn parse_bad_words(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Chat posting failure.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("message exceeds {limit} characters")]
    MessageTooLong { limit: usize },

    #[error("rate limit exceeded: {max_msgs} messages per {window_seconds}s")]
    RateLimited { max_msgs: u64, window_seconds: i64 },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ChatError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::Validation(e) => e.code(),
            ChatError::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            ChatError::RateLimited { .. } => "RATE_LIMITED",
            ChatError::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_not_found())
    }
}

/// Incoming message fields as the client sent them.
#[derive(Debug, Clone)]
pub struct PostMessage {
    pub name: String,
    pub text: String,
    pub ip: String,
}

/// Chat operations bound to one policy.
#[derive(Debug, Clone, Default)]
pub struct ChatService {
    policy: ChatPolicy,
}

impl ChatService {
    pub fn new(policy: ChatPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ChatPolicy {
        &self.policy
    }

    /// Validate, rate-limit and store one message at timestamp `now`.
    ///
    /// The send event is recorded before the message so that a crash between
    /// the two steps errs toward throttling, never toward letting a flood
    /// through.
    pub async fn post_message(
        &self,
        repo: &dyn FullRepository,
        post: PostMessage,
        now: DateTime<Utc>,
    ) -> Result<ChatMessage, ChatError> {
        let text = require_field("text", &post.text)?.to_string();
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(ChatError::MessageTooLong {
                limit: MAX_TEXT_CHARS,
            });
        }

        let name = match post.name.trim() {
            "" => ANON_NAME.to_string(),
            trimmed => trimmed.chars().take(MAX_NAME_CHARS).collect(),
        };

        let since = now - Duration::seconds(self.policy.window_seconds);
        let sent = repo.count_rate_events_since(&post.ip, since).await?;
        if sent >= self.policy.max_msgs {
            return Err(ChatError::RateLimited {
                max_msgs: self.policy.max_msgs,
                window_seconds: self.policy.window_seconds,
            });
        }
        repo.record_rate_event(&post.ip, now).await?;

        let flagged = self.is_flagged(&text);
        let draft = ChatMessageDraft {
            name,
            text,
            ip: post.ip,
            ts: now,
            flagged,
        };
        let id = repo.insert_message(draft.clone()).await?;

        Ok(ChatMessage {
            id,
            name: draft.name,
            text: draft.text,
            ip: draft.ip,
            ts: draft.ts,
            flagged: draft.flagged,
        })
    }

    fn is_flagged(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.policy.bad_words.iter().any(|w| lowered.contains(w))
    }

    /// Public listing: messages after `since` in arrival order, or the
    /// latest `limit` messages re-sorted ascending when `since` is absent.
    pub async fn list_public(
        &self,
        repo: &dyn FullRepository,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let messages = match since {
            Some(since) => repo.list_messages_after(since, limit).await?,
            None => {
                let mut latest = repo.list_recent_messages(false, limit).await?;
                latest.reverse();
                latest
            }
        };
        Ok(messages)
    }

    /// Moderation listing: newest first, optionally flagged-only.
    pub async fn list_moderation(
        &self,
        repo: &dyn FullRepository,
        flagged_only: bool,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(repo.list_recent_messages(flagged_only, limit).await?)
    }

    /// Remove one message. Unknown ids report NotFound.
    pub async fn delete_message(
        &self,
        repo: &dyn FullRepository,
        id: &MessageId,
    ) -> Result<(), ChatError> {
        repo.delete_message(id).await?;
        Ok(())
    }
}
