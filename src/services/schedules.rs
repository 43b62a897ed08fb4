//! Dated broadcast schedule entries.

use chrono::{DateTime, Utc};

use crate::db::repository::FullRepository;
use crate::models::{
    check_interval, require_field, BroadcastId, BroadcastSchedule, BroadcastScheduleDraft,
};

use super::ServiceResult;

/// Raw input for a new broadcast schedule entry.
#[derive(Debug, Clone)]
pub struct ScheduleInput {
    pub title: String,
    pub host: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Validate and store one schedule entry.
pub async fn create_schedule(
    repo: &dyn FullRepository,
    input: ScheduleInput,
) -> ServiceResult<BroadcastId> {
    let title = require_field("title", &input.title)?.to_string();
    check_interval(input.start_time, input.end_time)?;

    let draft = BroadcastScheduleDraft {
        title,
        host: input.host.trim().to_string(),
        description: input.description.trim().to_string(),
        start_time: input.start_time,
        end_time: input.end_time,
    };
    Ok(repo.insert_schedule(draft).await?)
}

/// All entries, newest first by start time.
pub async fn list_schedules(repo: &dyn FullRepository) -> ServiceResult<Vec<BroadcastSchedule>> {
    Ok(repo.list_schedules().await?)
}

/// Delete one entry. Unknown ids report NotFound.
pub async fn delete_schedule(repo: &dyn FullRepository, id: &BroadcastId) -> ServiceResult<()> {
    repo.delete_schedule(id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 7, h, 0, 0).unwrap()
    }

    fn input(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> ScheduleInput {
        ScheduleInput {
            title: title.to_string(),
            host: "DJ Rara".to_string(),
            description: String::new(),
            start_time: start,
            end_time: end,
        }
    }

    #[tokio::test]
    async fn create_and_list_newest_first() {
        let repo = LocalRepository::new();
        create_schedule(&repo, input("Morning Special", at(6), at(8))).await.unwrap();
        create_schedule(&repo, input("Evening Special", at(18), at(20))).await.unwrap();

        let listed = list_schedules(&repo).await.unwrap();
        assert_eq!(listed[0].title, "Evening Special");
        assert_eq!(listed[1].title, "Morning Special");
    }

    #[tokio::test]
    async fn end_must_follow_start() {
        let repo = LocalRepository::new();
        let err = create_schedule(&repo, input("Bad", at(8), at(8))).await.unwrap_err();
        assert!(matches!(err, crate::services::ServiceError::Validation(_)));
        let err = create_schedule(&repo, input("Worse", at(9), at(8))).await.unwrap_err();
        assert!(matches!(err, crate::services::ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn title_is_required() {
        let repo = LocalRepository::new();
        let err = create_schedule(&repo, input("  ", at(6), at(8))).await.unwrap_err();
        assert!(matches!(err, crate::services::ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let repo = LocalRepository::new();
        let err = delete_schedule(&repo, &BroadcastId::new("ghost")).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
