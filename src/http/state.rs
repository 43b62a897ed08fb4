//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::{ChatPolicy, ChatService};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Chat operations bound to the configured policy
    pub chat: ChatService,
}

impl AppState {
    /// Create a new application state with the given repository and the
    /// chat policy from the environment.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::with_chat_policy(repository, ChatPolicy::from_env())
    }

    /// Create application state with an explicit chat policy.
    pub fn with_chat_policy(repository: Arc<dyn FullRepository>, policy: ChatPolicy) -> Self {
        Self {
            repository,
            chat: ChatService::new(policy),
        }
    }
}
