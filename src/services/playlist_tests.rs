use super::*;
use crate::db::repositories::LocalRepository;
use crate::db::repository::SlotRepository;

fn input(day: &str, start: &str, end: &str, program: &str) -> SlotInput {
    SlotInput {
        day: day.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        program: program.to_string(),
        tracks: String::new(),
    }
}

#[test]
fn validation_order_is_day_start_end_interval_program() {
    // Bad day wins even when everything else is also bad.
    let err = input("funday", "nope", "also nope", "").validate().unwrap_err();
    assert_eq!(err.code(), "INVALID_DAY");

    let err = input("1", "nope", "also nope", "").validate().unwrap_err();
    assert_eq!(err.code(), "INVALID_TIME");

    let err = input("1", "08:00", "07:00", "").validate().unwrap_err();
    assert_eq!(err.code(), "NON_POSITIVE_DURATION");

    let err = input("1", "08:00", "09:00", "   ").validate().unwrap_err();
    assert_eq!(err.code(), "MISSING_REQUIRED_FIELD");
}

#[test]
fn zero_length_slot_is_rejected() {
    let err = input("senin", "08:00", "08:00", "Pagi").validate().unwrap_err();
    assert_eq!(err.code(), "NON_POSITIVE_DURATION");
}

#[test]
fn tracks_are_normalized() {
    let mut i = input("1", "08:00", "09:00", "Pagi Ceria");
    i.tracks = "one\r\ntwo\r\nthree\n".to_string();
    let validated = i.validate().unwrap();
    assert_eq!(validated.tracks, "one\ntwo\nthree");
}

#[tokio::test]
async fn append_assigns_increasing_sort_keys() {
    let repo = LocalRepository::new();
    let a = append_slot(&repo, &input("1", "06:00", "08:00", "a")).await.unwrap();
    let b = append_slot(&repo, &input("1", "08:00", "10:00", "b")).await.unwrap();
    let c = append_slot(&repo, &input("1", "05:00", "06:00", "c")).await.unwrap();
    assert_eq!(a.sort_key, 0);
    assert_eq!(b.sort_key, 1);
    // Appended last, so it lists last even though it starts earliest.
    assert_eq!(c.sort_key, 2);

    let listed = list_day(&repo, Weekday::MONDAY).await.unwrap();
    let programs: Vec<&str> = listed.iter().map(|s| s.program.as_str()).collect();
    assert_eq!(programs, ["a", "b", "c"]);
}

#[tokio::test]
async fn append_counts_per_day() {
    let repo = LocalRepository::new();
    let monday = append_slot(&repo, &input("1", "06:00", "08:00", "a")).await.unwrap();
    let friday = append_slot(&repo, &input("5", "06:00", "08:00", "b")).await.unwrap();
    assert_eq!(monday.sort_key, 0);
    assert_eq!(friday.sort_key, 0);
}

#[tokio::test]
async fn edit_keeps_position() {
    let repo = LocalRepository::new();
    append_slot(&repo, &input("1", "06:00", "08:00", "a")).await.unwrap();
    let b = append_slot(&repo, &input("1", "08:00", "10:00", "b")).await.unwrap();

    edit_slot(&repo, &b.id, &input("1", "11:00", "12:00", "b edited")).await.unwrap();
    let stored = repo.get_slot(&b.id).await.unwrap();
    assert_eq!(stored.program, "b edited");
    assert_eq!(stored.sort_key, 1);
}

#[tokio::test]
async fn reorder_rewrites_keys_from_list_position() {
    let repo = LocalRepository::new();
    let a = append_slot(&repo, &input("1", "06:00", "07:00", "a")).await.unwrap();
    let b = append_slot(&repo, &input("1", "07:00", "08:00", "b")).await.unwrap();
    let c = append_slot(&repo, &input("1", "08:00", "09:00", "c")).await.unwrap();

    let ids = vec![c.id.clone(), a.id.clone(), b.id.clone()];
    let attempted = reorder_day(&repo, Weekday::MONDAY, &ids).await.unwrap();
    assert_eq!(attempted, 3);

    let listed = list_day(&repo, Weekday::MONDAY).await.unwrap();
    let programs: Vec<&str> = listed.iter().map(|s| s.program.as_str()).collect();
    assert_eq!(programs, ["c", "a", "b"]);
    assert_eq!(listed[0].sort_key, 0);
    assert_eq!(listed[1].sort_key, 1);
    assert_eq!(listed[2].sort_key, 2);
}

#[tokio::test]
async fn reorder_skips_stale_ids() {
    let repo = LocalRepository::new();
    let a = append_slot(&repo, &input("1", "06:00", "07:00", "a")).await.unwrap();
    let b = append_slot(&repo, &input("1", "07:00", "08:00", "b")).await.unwrap();

    let ids = vec![
        b.id.clone(),
        SlotId::new("deleted-meanwhile"),
        a.id.clone(),
    ];
    let attempted = reorder_day(&repo, Weekday::MONDAY, &ids).await.unwrap();
    assert_eq!(attempted, 3);

    let listed = list_day(&repo, Weekday::MONDAY).await.unwrap();
    let programs: Vec<&str> = listed.iter().map(|s| s.program.as_str()).collect();
    // Stale id consumed position 1; the survivors keep their list positions.
    assert_eq!(programs, ["b", "a"]);
    assert_eq!(listed[0].sort_key, 0);
    assert_eq!(listed[1].sort_key, 2);
}

#[tokio::test]
async fn remove_unknown_slot_is_not_found() {
    let repo = LocalRepository::new();
    let err = remove_slot(&repo, &SlotId::new("ghost")).await.unwrap_err();
    assert!(err.is_not_found());
}
