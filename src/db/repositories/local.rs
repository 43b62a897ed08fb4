//! In-memory repository for unit testing and local development.
//!
//! Mirrors the behavior of the Postgres backend without external services.
//! All state lives behind one `RwLock`; every operation completes while the
//! lock is held, so the same partial-commit semantics the service layer is
//! written against (per-row, no cross-operation transaction) apply here too.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::db::repository::{
    ChatRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    RequestRepository, ScheduleRepository, SlotRepository, UpsertOutcome,
};
use crate::models::{
    BroadcastId, BroadcastSchedule, BroadcastScheduleDraft, ChatMessage, ChatMessageDraft,
    MessageId, RequestId, RequestStatus, Slot, SlotChanges, SlotDraft, SlotId, SongRequest,
    SongRequestDraft, Weekday,
};

#[derive(Debug, Default)]
struct Store {
    slots: Vec<Slot>,
    requests: Vec<SongRequest>,
    schedules: Vec<BroadcastSchedule>,
    messages: Vec<ChatMessage>,
    rate_events: Vec<(String, DateTime<Utc>)>,
}

/// In-memory implementation of all repository traits.
#[derive(Debug, Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn slot_not_found(id: &SlotId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("slot {} does not exist", id),
            ErrorContext::default()
                .with_entity("slot")
                .with_entity_id(id),
        )
    }
}

#[async_trait]
impl SlotRepository for LocalRepository {
    async fn insert_slot(&self, draft: SlotDraft) -> RepositoryResult<SlotId> {
        let id = SlotId::new(Self::fresh_id());
        let mut store = self.store.write();
        store.slots.push(Slot {
            id: id.clone(),
            day: draft.day,
            start: draft.start,
            end: draft.end,
            program: draft.program,
            tracks: draft.tracks,
            sort_key: draft.sort_key,
        });
        Ok(id)
    }

    async fn get_slot(&self, id: &SlotId) -> RepositoryResult<Slot> {
        let store = self.store.read();
        store
            .slots
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| Self::slot_not_found(id))
    }

    async fn update_slot(&self, id: &SlotId, changes: SlotChanges) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let slot = store
            .slots
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| Self::slot_not_found(id))?;
        changes.apply_to(slot);
        Ok(())
    }

    async fn upsert_slot(&self, id: &SlotId, draft: SlotDraft) -> RepositoryResult<UpsertOutcome> {
        let mut store = self.store.write();
        if let Some(slot) = store.slots.iter_mut().find(|s| &s.id == id) {
            // Existing record keeps its sort key; only content fields move.
            slot.day = draft.day;
            slot.start = draft.start;
            slot.end = draft.end;
            slot.program = draft.program;
            slot.tracks = draft.tracks;
            return Ok(UpsertOutcome::Updated);
        }

        let fresh = SlotId::new(Self::fresh_id());
        store.slots.push(Slot {
            id: fresh.clone(),
            day: draft.day,
            start: draft.start,
            end: draft.end,
            program: draft.program,
            tracks: draft.tracks,
            sort_key: draft.sort_key,
        });
        Ok(UpsertOutcome::Inserted(fresh))
    }

    async fn delete_slot(&self, id: &SlotId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let before = store.slots.len();
        store.slots.retain(|s| &s.id != id);
        if store.slots.len() == before {
            return Err(Self::slot_not_found(id));
        }
        Ok(())
    }

    async fn delete_all_slots(&self) -> RepositoryResult<usize> {
        let mut store = self.store.write();
        let removed = store.slots.len();
        store.slots.clear();
        Ok(removed)
    }

    async fn list_slots(&self) -> RepositoryResult<Vec<Slot>> {
        let store = self.store.read();
        let mut slots = store.slots.clone();
        slots.sort_by(|a, b| a.grid_cmp(b));
        Ok(slots)
    }

    async fn list_slots_by_day(&self, day: Weekday) -> RepositoryResult<Vec<Slot>> {
        let store = self.store.read();
        let mut slots: Vec<Slot> = store
            .slots
            .iter()
            .filter(|s| s.day == day)
            .cloned()
            .collect();
        slots.sort_by(|a, b| a.grid_cmp(b));
        Ok(slots)
    }

    async fn max_sort_key(&self, day: Weekday) -> RepositoryResult<i32> {
        let store = self.store.read();
        Ok(store
            .slots
            .iter()
            .filter(|s| s.day == day)
            .map(|s| s.sort_key)
            .max()
            .unwrap_or(-1))
    }
}

#[async_trait]
impl RequestRepository for LocalRepository {
    async fn insert_request(&self, draft: SongRequestDraft) -> RepositoryResult<RequestId> {
        let id = RequestId::new(Self::fresh_id());
        let mut store = self.store.write();
        store.requests.push(SongRequest {
            id: id.clone(),
            name: draft.name,
            title: draft.title,
            status: RequestStatus::New,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> RepositoryResult<Vec<SongRequest>> {
        let store = self.store.read();
        let mut requests: Vec<SongRequest> = store
            .requests
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn set_request_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
    ) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let request = store
            .requests
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("request {} does not exist", id),
                    ErrorContext::default()
                        .with_entity("request")
                        .with_entity_id(id),
                )
            })?;
        request.status = status;
        Ok(())
    }

    async fn count_new_requests(&self) -> RepositoryResult<u64> {
        let store = self.store.read();
        Ok(store
            .requests
            .iter()
            .filter(|r| r.status == RequestStatus::New)
            .count() as u64)
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn insert_schedule(
        &self,
        draft: BroadcastScheduleDraft,
    ) -> RepositoryResult<BroadcastId> {
        let id = BroadcastId::new(Self::fresh_id());
        let mut store = self.store.write();
        store.schedules.push(BroadcastSchedule {
            id: id.clone(),
            title: draft.title,
            host: draft.host,
            description: draft.description,
            start_time: draft.start_time,
            end_time: draft.end_time,
        });
        Ok(id)
    }

    async fn list_schedules(&self) -> RepositoryResult<Vec<BroadcastSchedule>> {
        let store = self.store.read();
        let mut schedules = store.schedules.clone();
        schedules.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(schedules)
    }

    async fn delete_schedule(&self, id: &BroadcastId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let before = store.schedules.len();
        store.schedules.retain(|s| &s.id != id);
        if store.schedules.len() == before {
            return Err(RepositoryError::not_found_with_context(
                format!("schedule {} does not exist", id),
                ErrorContext::default()
                    .with_entity("schedule")
                    .with_entity_id(id),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatRepository for LocalRepository {
    async fn insert_message(&self, draft: ChatMessageDraft) -> RepositoryResult<MessageId> {
        let id = MessageId::new(Self::fresh_id());
        let mut store = self.store.write();
        store.messages.push(ChatMessage {
            id: id.clone(),
            name: draft.name,
            text: draft.text,
            ip: draft.ip,
            ts: draft.ts,
            flagged: draft.flagged,
        });
        Ok(id)
    }

    async fn list_messages_after(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> RepositoryResult<Vec<ChatMessage>> {
        let store = self.store.read();
        let mut messages: Vec<ChatMessage> = store
            .messages
            .iter()
            .filter(|m| m.ts > since)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.ts.cmp(&b.ts));
        messages.truncate(limit);
        Ok(messages)
    }

    async fn list_recent_messages(
        &self,
        flagged_only: bool,
        limit: usize,
    ) -> RepositoryResult<Vec<ChatMessage>> {
        let store = self.store.read();
        let mut messages: Vec<ChatMessage> = store
            .messages
            .iter()
            .filter(|m| !flagged_only || m.flagged)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.ts.cmp(&a.ts));
        messages.truncate(limit);
        Ok(messages)
    }

    async fn delete_message(&self, id: &MessageId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let before = store.messages.len();
        store.messages.retain(|m| &m.id != id);
        if store.messages.len() == before {
            return Err(RepositoryError::not_found_with_context(
                format!("message {} does not exist", id),
                ErrorContext::default()
                    .with_entity("chat_message")
                    .with_entity_id(id),
            ));
        }
        Ok(())
    }

    async fn record_rate_event(&self, ip: &str, ts: DateTime<Utc>) -> RepositoryResult<()> {
        let mut store = self.store.write();
        store.rate_events.push((ip.to_string(), ts));
        Ok(())
    }

    async fn count_rate_events_since(
        &self,
        ip: &str,
        since: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        let store = self.store.read();
        Ok(store
            .rate_events
            .iter()
            .filter(|(event_ip, ts)| event_ip == ip && *ts >= since)
            .count() as u64)
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
