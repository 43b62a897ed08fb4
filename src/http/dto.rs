//! Request and response types for the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BroadcastSchedule, ChatMessage, RequestStatus, Slot, SongRequest};
use crate::services::{ExportStyle, ImportMode};

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

// =============================================================================
// Playlist grid
// =============================================================================

/// One grid slot as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDto {
    pub id: String,
    /// 0-based day index, Monday = 0
    pub day: u8,
    /// Indonesian display name for the day
    pub day_name: String,
    pub start: String,
    pub end: String,
    pub program: String,
    pub tracks: String,
    pub sort_key: i32,
}

impl From<Slot> for SlotDto {
    fn from(slot: Slot) -> Self {
        SlotDto {
            id: slot.id.to_string(),
            day: slot.day.index(),
            day_name: slot.day.name_id().to_string(),
            start: slot.start.to_string(),
            end: slot.end.to_string(),
            program: slot.program,
            tracks: slot.tracks,
            sort_key: slot.sort_key,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub slots: Vec<SlotDto>,
    pub total: usize,
}

/// Body for POST /v1/playlist. `day` accepts any token form: 1-based or
/// 0-based numbers, Indonesian or English names.
#[derive(Debug, Deserialize)]
pub struct CreateSlotRequest {
    pub day: String,
    pub start: String,
    pub end: String,
    pub program: String,
    #[serde(default)]
    pub tracks: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// Day token; every listed slot moves to this day.
    pub day: String,
    /// Slot ids in the desired display order.
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReorderResponse {
    /// Number of ids attempted (stale ids are skipped, not reported).
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct CsvExportQuery {
    #[serde(default)]
    pub style: ExportStyle,
}

#[derive(Debug, Deserialize)]
pub struct ImportCsvRequest {
    pub csv: String,
    #[serde(default)]
    pub mode: ImportMode,
}

// =============================================================================
// Song requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateRequestRequest {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDto {
    pub id: String,
    pub name: String,
    pub title: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<SongRequest> for RequestDto {
    fn from(request: SongRequest) -> Self {
        RequestDto {
            id: request.id.to_string(),
            name: request.name,
            title: request.title,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RequestsQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequestStatusRequest {
    pub status: RequestStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewRequestCountResponse {
    pub count: u64,
}

// =============================================================================
// Broadcast schedules
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBroadcastRequest {
    pub title: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastDto {
    pub id: String,
    pub title: String,
    pub host: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<BroadcastSchedule> for BroadcastDto {
    fn from(schedule: BroadcastSchedule) -> Self {
        BroadcastDto {
            id: schedule.id.to_string(),
            title: schedule.title,
            host: schedule.host,
            description: schedule.description,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
        }
    }
}

// =============================================================================
// Chat
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PostChatMessageRequest {
    #[serde(default)]
    pub name: String,
    pub text: String,
}

/// Public view of a chat message; the sender IP stays private.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub id: String,
    pub name: String,
    pub text: String,
    pub ts: DateTime<Utc>,
}

impl From<ChatMessage> for ChatMessageDto {
    fn from(message: ChatMessage) -> Self {
        ChatMessageDto {
            id: message.id.to_string(),
            name: message.name,
            text: message.text,
            ts: message.ts,
        }
    }
}

/// Moderation view: includes the sender IP and the flag state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationMessageDto {
    pub id: String,
    pub name: String,
    pub text: String,
    pub ip: String,
    pub ts: DateTime<Utc>,
    pub flagged: bool,
}

impl From<ChatMessage> for ModerationMessageDto {
    fn from(message: ChatMessage) -> Self {
        ModerationMessageDto {
            id: message.id.to_string(),
            name: message.name,
            text: message.text,
            ip: message.ip,
            ts: message.ts,
            flagged: message.flagged,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ModerationQuery {
    #[serde(default)]
    pub flagged: bool,
    pub limit: Option<usize>,
}

// =============================================================================
// Shared
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}
