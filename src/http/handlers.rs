//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;

use super::dto::{
    BroadcastDto, ChatMessageDto, ChatQuery, CreateBroadcastRequest, CreateRequestRequest,
    CreateSlotRequest, CreatedResponse, CsvExportQuery, HealthResponse, ImportCsvRequest,
    ModerationMessageDto, ModerationQuery, NewRequestCountResponse, PlaylistResponse,
    PostChatMessageRequest, ReorderRequest, ReorderResponse, RequestDto, RequestsQuery, SlotDto,
    UpdateRequestStatusRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{BroadcastId, MessageId, SlotId, Weekday};
use crate::services::{grid_csv, playlist, requests, schedules, ImportSummary, PostMessage};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Default and maximum page size for chat listings.
const CHAT_DEFAULT_LIMIT: usize = 50;
const CHAT_MAX_LIMIT: usize = 200;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Playlist grid
// =============================================================================

/// GET /v1/playlist
///
/// The whole weekly grid in display order.
pub async fn list_playlist(State(state): State<AppState>) -> HandlerResult<PlaylistResponse> {
    let slots = playlist::list_grid(state.repository.as_ref()).await?;
    let slots: Vec<SlotDto> = slots.into_iter().map(Into::into).collect();
    let total = slots.len();
    Ok(Json(PlaylistResponse { slots, total }))
}

/// POST /v1/playlist
///
/// Validate and append one slot at the end of its day.
pub async fn create_slot(
    State(state): State<AppState>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<SlotDto>), AppError> {
    let input = playlist::SlotInput {
        day: request.day,
        start: request.start,
        end: request.end,
        program: request.program,
        tracks: request.tracks,
    };
    let slot = playlist::append_slot(state.repository.as_ref(), &input).await?;
    info!(slot_id = %slot.id, day = %slot.day, "slot appended");
    Ok((StatusCode::CREATED, Json(slot.into())))
}

/// PUT /v1/playlist/{id}
///
/// Validate and replace one slot's fields. The slot keeps its position in
/// the day; only a reorder changes sort keys.
pub async fn update_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<StatusCode, AppError> {
    let input = playlist::SlotInput {
        day: request.day,
        start: request.start,
        end: request.end,
        program: request.program,
        tracks: request.tracks,
    };
    playlist::edit_slot(state.repository.as_ref(), &SlotId::new(id), &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/playlist/{id}
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    playlist::remove_slot(state.repository.as_ref(), &SlotId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/playlist/reorder
///
/// Rewrite a day's ordering from an explicit id sequence.
pub async fn reorder_playlist(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> HandlerResult<ReorderResponse> {
    let day = Weekday::parse_token(&request.day)
        .map_err(crate::services::ServiceError::Validation)?;
    let ids: Vec<SlotId> = request.ids.into_iter().map(SlotId::new).collect();
    let count = playlist::reorder_day(state.repository.as_ref(), day, &ids).await?;
    Ok(Json(ReorderResponse { count }))
}

/// GET /v1/playlist/csv?style=plain|identified
///
/// The grid as a downloadable CSV file.
pub async fn export_playlist_csv(
    State(state): State<AppState>,
    Query(query): Query<CsvExportQuery>,
) -> Result<Response, AppError> {
    let body = grid_csv::export_grid(state.repository.as_ref(), query.style).await?;
    let disposition = format!("attachment; filename=\"{}\"", query.style.filename());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /v1/playlist/csv
///
/// Import a CSV file into the grid. Rows commit one by one; the first
/// invalid row aborts with its line number, earlier rows stay committed.
pub async fn import_playlist_csv(
    State(state): State<AppState>,
    Json(request): Json<ImportCsvRequest>,
) -> HandlerResult<ImportSummary> {
    let summary =
        grid_csv::import_grid(state.repository.as_ref(), &request.csv, request.mode).await?;
    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        "playlist CSV imported"
    );
    Ok(Json(summary))
}

// =============================================================================
// Song requests
// =============================================================================

/// POST /v1/requests
pub async fn create_request(
    State(state): State<AppState>,
    Json(request): Json<CreateRequestRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id =
        requests::submit_request(state.repository.as_ref(), &request.name, &request.title).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.to_string() }),
    ))
}

/// GET /v1/requests?status=
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestsQuery>,
) -> HandlerResult<Vec<RequestDto>> {
    let listed = requests::list_requests(state.repository.as_ref(), query.status).await?;
    Ok(Json(listed.into_iter().map(Into::into).collect()))
}

/// POST /v1/requests/{id}/status
pub async fn update_request_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRequestStatusRequest>,
) -> Result<StatusCode, AppError> {
    requests::update_request_status(
        state.repository.as_ref(),
        &crate::models::RequestId::new(id),
        request.status,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/requests/new-count
pub async fn new_request_count(
    State(state): State<AppState>,
) -> HandlerResult<NewRequestCountResponse> {
    let count = requests::new_request_count(state.repository.as_ref()).await?;
    Ok(Json(NewRequestCountResponse { count }))
}

// =============================================================================
// Broadcast schedules
// =============================================================================

/// GET /v1/schedules
pub async fn list_schedules(State(state): State<AppState>) -> HandlerResult<Vec<BroadcastDto>> {
    let listed = schedules::list_schedules(state.repository.as_ref()).await?;
    Ok(Json(listed.into_iter().map(Into::into).collect()))
}

/// POST /v1/schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<CreateBroadcastRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let input = schedules::ScheduleInput {
        title: request.title,
        host: request.host,
        description: request.description,
        start_time: request.start_time,
        end_time: request.end_time,
    };
    let id = schedules::create_schedule(state.repository.as_ref(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.to_string() }),
    ))
}

/// DELETE /v1/schedules/{id}
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    schedules::delete_schedule(state.repository.as_ref(), &BroadcastId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Chat
// =============================================================================

/// Client IP for rate limiting: first entry of `X-Forwarded-For` when the
/// server sits behind a proxy, otherwise a shared fallback bucket.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// GET /v1/chat/messages?since=&limit=
pub async fn list_chat_messages(
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
) -> HandlerResult<Vec<ChatMessageDto>> {
    let limit = query.limit.unwrap_or(CHAT_DEFAULT_LIMIT).min(CHAT_MAX_LIMIT);
    let messages = state
        .chat
        .list_public(state.repository.as_ref(), query.since, limit)
        .await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// POST /v1/chat/messages
pub async fn post_chat_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PostChatMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageDto>), AppError> {
    let post = PostMessage {
        name: request.name,
        text: request.text,
        ip: client_ip(&headers),
    };
    let message = state
        .chat
        .post_message(state.repository.as_ref(), post, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

/// GET /v1/chat/moderation?flagged=&limit=
pub async fn list_chat_moderation(
    State(state): State<AppState>,
    Query(query): Query<ModerationQuery>,
) -> HandlerResult<Vec<ModerationMessageDto>> {
    let limit = query.limit.unwrap_or(CHAT_DEFAULT_LIMIT).min(CHAT_MAX_LIMIT);
    let messages = state
        .chat
        .list_moderation(state.repository.as_ref(), query.flagged, limit)
        .await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// DELETE /v1/chat/messages/{id}
pub async fn delete_chat_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .chat
        .delete_message(state.repository.as_ref(), &MessageId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
