use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{broadcast_schedules, chat_messages, playlist_slots, song_requests};
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{
    BroadcastId, BroadcastSchedule, ChatMessage, ClockTime, MessageId, RequestId, RequestStatus,
    Slot, SlotId, SongRequest, Weekday,
};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = playlist_slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SlotRow {
    pub id: String,
    pub day: i16,
    pub start_minutes: i32,
    pub end_minutes: i32,
    pub program: String,
    pub tracks: String,
    pub sort_key: i32,
}

impl SlotRow {
    pub fn from_slot(slot: &Slot) -> Self {
        SlotRow {
            id: slot.id.as_str().to_string(),
            day: i16::from(slot.day.index()),
            start_minutes: i32::from(slot.start.minutes()),
            end_minutes: i32::from(slot.end.minutes()),
            program: slot.program.clone(),
            tracks: slot.tracks.clone(),
            sort_key: slot.sort_key,
        }
    }

    pub fn into_slot(self) -> RepositoryResult<Slot> {
        let day = u8::try_from(self.day)
            .ok()
            .and_then(|d| Weekday::try_from(d).ok())
            .ok_or_else(|| {
                RepositoryError::internal(format!("slot {} has day {} out of range", self.id, self.day))
            })?;
        let start = minutes_column(&self.id, "start_minutes", self.start_minutes)?;
        let end = minutes_column(&self.id, "end_minutes", self.end_minutes)?;

        Ok(Slot {
            id: SlotId::new(self.id),
            day,
            start,
            end,
            program: self.program,
            tracks: self.tracks,
            sort_key: self.sort_key,
        })
    }
}

fn minutes_column(id: &str, column: &str, value: i32) -> RepositoryResult<ClockTime> {
    u16::try_from(value)
        .map(ClockTime::from_minutes)
        .map_err(|_| RepositoryError::internal(format!("slot {id} has negative {column}: {value}")))
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = song_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SongRequestRow {
    pub id: String,
    pub name: String,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl SongRequestRow {
    pub fn from_request(request: &SongRequest) -> Self {
        SongRequestRow {
            id: request.id.as_str().to_string(),
            name: request.name.clone(),
            title: request.title.clone(),
            status: request.status.to_string(),
            created_at: request.created_at,
        }
    }

    pub fn into_request(self) -> RepositoryResult<SongRequest> {
        let status = parse_status(&self.id, &self.status)?;
        Ok(SongRequest {
            id: RequestId::new(self.id),
            name: self.name,
            title: self.title,
            status,
            created_at: self.created_at,
        })
    }
}

pub fn parse_status(id: &str, status: &str) -> RepositoryResult<RequestStatus> {
    match status {
        "New" => Ok(RequestStatus::New),
        "In-Progress" => Ok(RequestStatus::InProgress),
        "Done" => Ok(RequestStatus::Done),
        other => Err(RepositoryError::internal(format!(
            "request {id} has unknown status {other:?}"
        ))),
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = broadcast_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BroadcastScheduleRow {
    pub id: String,
    pub title: String,
    pub host: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl BroadcastScheduleRow {
    pub fn from_schedule(schedule: &BroadcastSchedule) -> Self {
        BroadcastScheduleRow {
            id: schedule.id.as_str().to_string(),
            title: schedule.title.clone(),
            host: schedule.host.clone(),
            description: schedule.description.clone(),
            start_time: schedule.start_time,
            end_time: schedule.end_time,
        }
    }

    pub fn into_schedule(self) -> BroadcastSchedule {
        BroadcastSchedule {
            id: BroadcastId::new(self.id),
            title: self.title,
            host: self.host,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatMessageRow {
    pub id: String,
    pub name: String,
    pub body: String,
    pub ip: String,
    pub ts: DateTime<Utc>,
    pub flagged: bool,
}

impl ChatMessageRow {
    pub fn from_message(message: &ChatMessage) -> Self {
        ChatMessageRow {
            id: message.id.as_str().to_string(),
            name: message.name.clone(),
            body: message.text.clone(),
            ip: message.ip.clone(),
            ts: message.ts,
            flagged: message.flagged,
        }
    }

    pub fn into_message(self) -> ChatMessage {
        ChatMessage {
            id: MessageId::new(self.id),
            name: self.name,
            text: self.body,
            ip: self.ip,
            ts: self.ts,
            flagged: self.flagged,
        }
    }
}
