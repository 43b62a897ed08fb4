//! Listener song request workflow.

use crate::db::repository::FullRepository;
use crate::models::{require_field, RequestId, RequestStatus, SongRequest, SongRequestDraft};

use super::ServiceResult;

/// Accept a new song request; both fields are required and stored trimmed.
pub async fn submit_request(
    repo: &dyn FullRepository,
    name: &str,
    title: &str,
) -> ServiceResult<RequestId> {
    let draft = SongRequestDraft {
        name: require_field("name", name)?.to_string(),
        title: require_field("title", title)?.to_string(),
    };
    Ok(repo.insert_request(draft).await?)
}

/// Requests newest-first, optionally filtered by workflow status.
pub async fn list_requests(
    repo: &dyn FullRepository,
    status: Option<RequestStatus>,
) -> ServiceResult<Vec<SongRequest>> {
    Ok(repo.list_requests(status).await?)
}

/// Move one request to a new status. Unknown ids report NotFound.
pub async fn update_request_status(
    repo: &dyn FullRepository,
    id: &RequestId,
    status: RequestStatus,
) -> ServiceResult<()> {
    repo.set_request_status(id, status).await?;
    Ok(())
}

/// Number of requests still waiting, for the dashboard badge.
pub async fn new_request_count(repo: &dyn FullRepository) -> ServiceResult<u64> {
    Ok(repo.count_new_requests().await?)
}
