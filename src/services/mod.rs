//! Business logic on top of the repository traits.
//!
//! Each submodule owns one admin surface: the weekly playlist grid, its CSV
//! codec, listener song requests, broadcast schedules and the moderated chat.
//! Functions here take `&dyn FullRepository` so they run identically against
//! the Postgres and in-memory backends.

pub mod chat;
pub mod grid_csv;
pub mod playlist;
pub mod requests;
pub mod schedules;

pub use chat::{ChatError, ChatPolicy, ChatService, PostMessage};
pub use grid_csv::{ExportStyle, ImportError, ImportMode, ImportSummary};
pub use playlist::SlotInput;

use crate::db::repository::RepositoryError;
use crate::models::ValidationError;

/// Error type shared by the CRUD-style services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed field-level validation; maps to a client error.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backing store failed or the entity does not exist.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// True when the underlying cause is a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_not_found())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
