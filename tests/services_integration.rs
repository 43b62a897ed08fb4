use haloradio_rust::db::repositories::LocalRepository;
use haloradio_rust::models::{RequestStatus, SlotId, Weekday};
use haloradio_rust::services::{playlist, requests, schedules};

use chrono::{TimeZone, Utc};

fn slot_input(day: &str, start: &str, end: &str, program: &str) -> playlist::SlotInput {
    playlist::SlotInput {
        day: day.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        program: program.to_string(),
        tracks: String::new(),
    }
}

#[tokio::test]
async fn test_health_check() {
    use haloradio_rust::db::repository::FullRepository;
    let repo = LocalRepository::new();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_append_lands_at_end_of_day() {
    let repo = LocalRepository::new();
    playlist::append_slot(&repo, &slot_input("1", "06:00", "08:00", "Pagi Ceria"))
        .await
        .unwrap();
    playlist::append_slot(&repo, &slot_input("1", "04:00", "05:00", "Subuh"))
        .await
        .unwrap();

    // Appends follow insertion order, not start time.
    let monday = playlist::list_day(&repo, Weekday::MONDAY).await.unwrap();
    let programs: Vec<&str> = monday.iter().map(|s| s.program.as_str()).collect();
    assert_eq!(programs, ["Pagi Ceria", "Subuh"]);
    assert_eq!(monday[0].sort_key, 0);
    assert_eq!(monday[1].sort_key, 1);
}

#[tokio::test]
async fn test_day_tokens_resolve_to_one_grid_day() {
    let repo = LocalRepository::new();
    // 1-based numeric, Indonesian name and English name all mean Monday.
    playlist::append_slot(&repo, &slot_input("1", "06:00", "07:00", "A")).await.unwrap();
    playlist::append_slot(&repo, &slot_input("Senin", "07:00", "08:00", "B")).await.unwrap();
    playlist::append_slot(&repo, &slot_input("monday", "08:00", "09:00", "C")).await.unwrap();

    let monday = playlist::list_day(&repo, Weekday::MONDAY).await.unwrap();
    assert_eq!(monday.len(), 3);
}

#[tokio::test]
async fn test_grid_lists_monday_first() {
    let repo = LocalRepository::new();
    playlist::append_slot(&repo, &slot_input("7", "10:00", "11:00", "Minggu Santai"))
        .await
        .unwrap();
    playlist::append_slot(&repo, &slot_input("1", "06:00", "08:00", "Pagi Ceria"))
        .await
        .unwrap();

    let grid = playlist::list_grid(&repo).await.unwrap();
    assert_eq!(grid[0].program, "Pagi Ceria");
    assert_eq!(grid[1].program, "Minggu Santai");
}

#[tokio::test]
async fn test_reorder_rewrites_keys_from_id_positions() {
    let repo = LocalRepository::new();
    let a = playlist::append_slot(&repo, &slot_input("3", "06:00", "07:00", "A")).await.unwrap();
    let b = playlist::append_slot(&repo, &slot_input("3", "07:00", "08:00", "B")).await.unwrap();
    let c = playlist::append_slot(&repo, &slot_input("3", "08:00", "09:00", "C")).await.unwrap();

    let ids = vec![c.id.clone(), a.id.clone(), b.id.clone()];
    let count = playlist::reorder_day(&repo, Weekday::parse_token("3").unwrap(), &ids)
        .await
        .unwrap();
    assert_eq!(count, 3);

    let day = playlist::list_day(&repo, Weekday::parse_token("3").unwrap()).await.unwrap();
    let programs: Vec<&str> = day.iter().map(|s| s.program.as_str()).collect();
    assert_eq!(programs, ["C", "A", "B"]);
    let keys: Vec<i32> = day.iter().map(|s| s.sort_key).collect();
    assert_eq!(keys, [0, 1, 2]);
}

#[tokio::test]
async fn test_reorder_skips_stale_ids_but_counts_them() {
    let repo = LocalRepository::new();
    let a = playlist::append_slot(&repo, &slot_input("2", "06:00", "07:00", "A")).await.unwrap();
    let b = playlist::append_slot(&repo, &slot_input("2", "07:00", "08:00", "B")).await.unwrap();

    let ids = vec![b.id.clone(), SlotId::new("deleted-meanwhile"), a.id.clone()];
    let count = playlist::reorder_day(&repo, Weekday::parse_token("2").unwrap(), &ids)
        .await
        .unwrap();
    // The stale id still consumes its position in the sequence.
    assert_eq!(count, 3);

    let day = playlist::list_day(&repo, Weekday::parse_token("2").unwrap()).await.unwrap();
    let keys: Vec<i32> = day.iter().map(|s| s.sort_key).collect();
    assert_eq!(keys, [0, 2]);
}

#[tokio::test]
async fn test_edit_keeps_position() {
    let repo = LocalRepository::new();
    let a = playlist::append_slot(&repo, &slot_input("5", "06:00", "07:00", "A")).await.unwrap();
    let b = playlist::append_slot(&repo, &slot_input("5", "07:00", "08:00", "B")).await.unwrap();

    playlist::edit_slot(&repo, &a.id, &slot_input("5", "05:00", "06:30", "A edited"))
        .await
        .unwrap();

    let day = playlist::list_day(&repo, Weekday::parse_token("5").unwrap()).await.unwrap();
    assert_eq!(day[0].program, "A edited");
    assert_eq!(day[0].sort_key, 0);
    assert_eq!(day[1].id, b.id);
}

#[tokio::test]
async fn test_validation_rejects_bad_input() {
    let repo = LocalRepository::new();

    let err = playlist::append_slot(&repo, &slot_input("8", "06:00", "07:00", "X"))
        .await
        .unwrap_err();
    assert!(matches!(err, haloradio_rust::services::ServiceError::Validation(_)));

    let err = playlist::append_slot(&repo, &slot_input("1", "6am", "07:00", "X"))
        .await
        .unwrap_err();
    assert!(matches!(err, haloradio_rust::services::ServiceError::Validation(_)));

    let err = playlist::append_slot(&repo, &slot_input("1", "08:00", "07:00", "X"))
        .await
        .unwrap_err();
    assert!(matches!(err, haloradio_rust::services::ServiceError::Validation(_)));

    let err = playlist::append_slot(&repo, &slot_input("1", "06:00", "07:00", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, haloradio_rust::services::ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_remove_slot() {
    let repo = LocalRepository::new();
    let a = playlist::append_slot(&repo, &slot_input("1", "06:00", "07:00", "A")).await.unwrap();
    playlist::remove_slot(&repo, &a.id).await.unwrap();
    assert!(playlist::list_grid(&repo).await.unwrap().is_empty());

    let err = playlist::remove_slot(&repo, &a.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_song_request_workflow() {
    let repo = LocalRepository::new();
    let id = requests::submit_request(&repo, "Budi", "Laskar Pelangi").await.unwrap();
    requests::submit_request(&repo, "Sari", "Bengawan Solo").await.unwrap();
    assert_eq!(requests::new_request_count(&repo).await.unwrap(), 2);

    requests::update_request_status(&repo, &id, RequestStatus::InProgress).await.unwrap();
    requests::update_request_status(&repo, &id, RequestStatus::Done).await.unwrap();
    assert_eq!(requests::new_request_count(&repo).await.unwrap(), 1);

    let done = requests::list_requests(&repo, Some(RequestStatus::Done)).await.unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].title, "Laskar Pelangi");
}

#[tokio::test]
async fn test_broadcast_schedule_crud() {
    let repo = LocalRepository::new();
    let start = Utc.with_ymd_and_hms(2024, 9, 14, 18, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 9, 14, 20, 0, 0).unwrap();

    let id = schedules::create_schedule(
        &repo,
        schedules::ScheduleInput {
            title: "Malam Minggu Live".to_string(),
            host: "DJ Rara".to_string(),
            description: "Siaran langsung".to_string(),
            start_time: start,
            end_time: end,
        },
    )
    .await
    .unwrap();

    let listed = schedules::list_schedules(&repo).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].title, "Malam Minggu Live");

    schedules::delete_schedule(&repo, &id).await.unwrap();
    assert!(schedules::list_schedules(&repo).await.unwrap().is_empty());
}
