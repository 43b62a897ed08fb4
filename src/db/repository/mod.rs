//! Repository trait definitions.
//!
//! These traits are the persistence boundary of the application: they perform
//! no field-level validation (that is the caller's job, see
//! [`crate::models::validation`]) and expose exactly the point operations and
//! ordered listings the service layer needs. Implementations live in
//! [`crate::db::repositories`].

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    BroadcastId, BroadcastSchedule, BroadcastScheduleDraft, ChatMessage, ChatMessageDraft,
    MessageId, RequestId, RequestStatus, Slot, SlotChanges, SlotDraft, SlotId, SongRequest,
    SongRequestDraft, Weekday,
};

/// Outcome of an upsert: whether the record was created or updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The id was unknown (or absent); a new record was created with a fresh
    /// store-assigned id.
    Inserted(SlotId),
    /// The id resolved to an existing record, which was updated in place.
    Updated,
}

/// Repository trait for weekly grid slots.
///
/// Ordering contract: listings sort by `sort_key` ascending with `start` as
/// the tie-break, and the full-grid listing prefixes that with day ascending.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert a new slot and return its store-assigned id.
    async fn insert_slot(&self, draft: SlotDraft) -> RepositoryResult<SlotId>;

    /// Fetch one slot by id.
    async fn get_slot(&self, id: &SlotId) -> RepositoryResult<Slot>;

    /// Apply a partial update to one slot.
    async fn update_slot(&self, id: &SlotId, changes: SlotChanges) -> RepositoryResult<()>;

    /// Update-or-insert by id.
    ///
    /// When the id resolves, all draft fields except `sort_key` are applied
    /// and the stored `sort_key` is preserved; when it does not, the draft is
    /// inserted as-is under a fresh id.
    async fn upsert_slot(&self, id: &SlotId, draft: SlotDraft) -> RepositoryResult<UpsertOutcome>;

    /// Delete one slot. Unknown ids report `NotFound`.
    async fn delete_slot(&self, id: &SlotId) -> RepositoryResult<()>;

    /// Delete every slot, returning how many were removed.
    async fn delete_all_slots(&self) -> RepositoryResult<usize>;

    /// All slots ordered day asc, sort_key asc, start asc.
    async fn list_slots(&self) -> RepositoryResult<Vec<Slot>>;

    /// Slots of one day ordered sort_key asc, start asc.
    async fn list_slots_by_day(&self, day: Weekday) -> RepositoryResult<Vec<Slot>>;

    /// Highest sort key currently stored for a day, or -1 when the day is
    /// empty. The next append key is always derived from this query; there is
    /// no separate counter to drift out of sync.
    async fn max_sort_key(&self, day: Weekday) -> RepositoryResult<i32>;
}

/// Repository trait for listener song requests.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Store a new request with status `New` and the current timestamp.
    async fn insert_request(&self, draft: SongRequestDraft) -> RepositoryResult<RequestId>;

    /// Requests newest-first, optionally filtered by status.
    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> RepositoryResult<Vec<SongRequest>>;

    /// Move one request to a new workflow status.
    async fn set_request_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
    ) -> RepositoryResult<()>;

    /// Number of requests still in status `New`.
    async fn count_new_requests(&self) -> RepositoryResult<u64>;
}

/// Repository trait for dated broadcast schedule entries.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn insert_schedule(&self, draft: BroadcastScheduleDraft)
        -> RepositoryResult<BroadcastId>;

    /// Entries ordered by start time, newest first.
    async fn list_schedules(&self) -> RepositoryResult<Vec<BroadcastSchedule>>;

    async fn delete_schedule(&self, id: &BroadcastId) -> RepositoryResult<()>;
}

/// Repository trait for chat messages and the chat rate-limit ledger.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn insert_message(&self, draft: ChatMessageDraft) -> RepositoryResult<MessageId>;

    /// Messages strictly after `since`, oldest first, capped at `limit`.
    async fn list_messages_after(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RepositoryResult<Vec<ChatMessage>>;

    /// The latest `limit` messages, newest first, optionally flagged-only.
    async fn list_recent_messages(
        &self,
        flagged_only: bool,
        limit: usize,
    ) -> RepositoryResult<Vec<ChatMessage>>;

    async fn delete_message(&self, id: &MessageId) -> RepositoryResult<()>;

    /// Record one send event for the rate-limit window.
    async fn record_rate_event(&self, ip: &str, ts: DateTime<Utc>) -> RepositoryResult<()>;

    /// Count send events from `ip` at or after `since`.
    async fn count_rate_events_since(
        &self,
        ip: &str,
        since: DateTime<Utc>,
    ) -> RepositoryResult<u64>;
}

/// Combined repository interface used by the application.
#[async_trait]
pub trait FullRepository:
    SlotRepository + RequestRepository + ScheduleRepository + ChatRepository
{
    /// Check the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
