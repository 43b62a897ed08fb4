use super::*;
use crate::db::repositories::LocalRepository;
use crate::db::repository::SlotRepository;
use crate::services::playlist::{append_slot, list_grid};

fn slot_input(day: &str, start: &str, end: &str, program: &str) -> crate::services::SlotInput {
    crate::services::SlotInput {
        day: day.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        program: program.to_string(),
        tracks: String::new(),
    }
}

async fn seeded_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    append_slot(&repo, &slot_input("1", "06:00", "08:00", "Pagi Ceria")).await.unwrap();
    append_slot(&repo, &slot_input("1", "08:00", "10:00", "Dangdut Pagi")).await.unwrap();
    append_slot(&repo, &slot_input("7", "20:00", "22:00", "Malam Minggu")).await.unwrap();
    repo
}

#[tokio::test]
async fn plain_export_has_row_numbers_and_day_names() {
    let repo = seeded_repo().await;
    let csv = export_grid(&repo, ExportStyle::Plain).await.unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next().unwrap(), "no,day,day_name,start,end,program,tracks");
    assert_eq!(lines.next().unwrap(), "1,1,Senin,06:00,08:00,Pagi Ceria,");
    assert_eq!(lines.next().unwrap(), "2,1,Senin,08:00,10:00,Dangdut Pagi,");
    assert_eq!(lines.next().unwrap(), "3,7,Minggu,20:00,22:00,Malam Minggu,");
    assert!(lines.next().is_none());
}

#[tokio::test]
async fn identified_export_carries_slot_ids() {
    let repo = seeded_repo().await;
    let slots = list_grid(&repo).await.unwrap();
    let csv = export_grid(&repo, ExportStyle::Identified).await.unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next().unwrap(), "id,day,day_name,start,end,program,tracks");
    let first = lines.next().unwrap();
    assert!(first.starts_with(slots[0].id.as_str()));
}

#[test]
fn filenames_per_style() {
    assert_eq!(ExportStyle::Plain.filename(), "playlist.csv");
    assert_eq!(ExportStyle::Identified.filename(), "playlist_with_ids.csv");
}

#[tokio::test]
async fn append_import_lands_after_existing_slots() {
    let repo = seeded_repo().await;
    let csv = "day,start,end,program\n\
               1,10:00,12:00,Siang Santai\n\
               senin,12:00,13:00,Berita\n";
    let summary = import_grid(&repo, csv, ImportMode::Append).await.unwrap();
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.updated, 0);

    let slots = list_grid(&repo).await.unwrap();
    let monday: Vec<(&str, i32)> = slots
        .iter()
        .filter(|s| s.day == Weekday::MONDAY)
        .map(|s| (s.program.as_str(), s.sort_key))
        .collect();
    assert_eq!(
        monday,
        [
            ("Pagi Ceria", 0),
            ("Dangdut Pagi", 1),
            ("Siang Santai", 2),
            ("Berita", 3),
        ]
    );
}

#[tokio::test]
async fn append_import_with_known_id_updates_in_place() {
    let repo = seeded_repo().await;
    let slots = list_grid(&repo).await.unwrap();
    let target = &slots[0];

    let csv = format!(
        "id,day,start,end,program\n{},1,06:30,08:30,Pagi Ceria Baru\n",
        target.id
    );
    let summary = import_grid(&repo, &csv, ImportMode::Append).await.unwrap();
    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.updated, 1);

    let stored = repo.get_slot(&target.id).await.unwrap();
    assert_eq!(stored.program, "Pagi Ceria Baru");
    assert_eq!(stored.start.to_string(), "06:30");
    // Position in the day is untouched by an update.
    assert_eq!(stored.sort_key, target.sort_key);
}

#[tokio::test]
async fn update_rows_do_not_consume_append_positions() {
    let repo = seeded_repo().await;
    let slots = list_grid(&repo).await.unwrap();
    let target = &slots[0];

    // An update row followed by an insert row on the same day: the insert
    // gets the first free position, not the second.
    let csv = format!(
        "id,day,start,end,program\n\
         {},1,06:30,08:30,Edited\n\
         ,1,10:00,11:00,Fresh\n",
        target.id
    );
    let summary = import_grid(&repo, &csv, ImportMode::Append).await.unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 1);

    let monday = repo.list_slots_by_day(Weekday::MONDAY).await.unwrap();
    let fresh = monday.iter().find(|s| s.program == "Fresh").unwrap();
    assert_eq!(fresh.sort_key, 2);
}

#[tokio::test]
async fn replace_import_leaves_exactly_the_file_rows() {
    let repo = seeded_repo().await;
    let csv = "day,start,end,program\n\
               2,07:00,08:00,Selasa Show\n\
               2,08:00,09:00,Kuis Pagi\n";
    let summary = import_grid(&repo, csv, ImportMode::Replace).await.unwrap();
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.mode, ImportMode::Replace);

    let slots = list_grid(&repo).await.unwrap();
    assert_eq!(slots.len(), 2);
    assert!(slots.iter().all(|s| s.day.one_based() == 2));
    assert_eq!(slots[0].sort_key, 0);
    assert_eq!(slots[1].sort_key, 1);
}

#[tokio::test]
async fn replace_import_ignores_stale_ids() {
    let repo = seeded_repo().await;
    let slots = list_grid(&repo).await.unwrap();
    let old_id = slots[0].id.clone();

    let csv = format!("id,day,start,end,program\n{},3,07:00,08:00,Rabu Rock\n", old_id);
    let summary = import_grid(&repo, &csv, ImportMode::Replace).await.unwrap();
    assert_eq!(summary.inserted, 1);

    let remaining = list_grid(&repo).await.unwrap();
    assert_eq!(remaining.len(), 1);
    // The wiped id is gone; the row got a fresh one.
    assert_ne!(remaining[0].id, old_id);
}

#[tokio::test]
async fn day_name_column_is_enough() {
    let repo = LocalRepository::new();
    let csv = "day_name,start,end,program\n\
               Jum'at,16:00,18:00,Sore Religi\n";
    let summary = import_grid(&repo, csv, ImportMode::Append).await.unwrap();
    assert_eq!(summary.inserted, 1);
    let slots = list_grid(&repo).await.unwrap();
    assert_eq!(slots[0].day.name_id(), "Jumat");
}

#[tokio::test]
async fn headers_match_case_insensitively() {
    let repo = LocalRepository::new();
    let csv = "No,Day,Day_Name,Start,End,Program,Tracks\n\
               1,4,Kamis,09:00,10:00,Request Pagi,lagu satu\n";
    let summary = import_grid(&repo, csv, ImportMode::Append).await.unwrap();
    assert_eq!(summary.inserted, 1);
    let slots = list_grid(&repo).await.unwrap();
    assert_eq!(slots[0].tracks, "lagu satu");
}

#[tokio::test]
async fn missing_required_column_is_rejected() {
    let repo = LocalRepository::new();
    let err = import_grid(&repo, "day,start,end\n1,08:00,09:00\n", ImportMode::Append)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::MissingColumn { name: "program" }));
    assert_eq!(err.code(), "MISSING_REQUIRED_COLUMN");

    let err = import_grid(&repo, "start,end,program\n08:00,09:00,x\n", ImportMode::Append)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::MissingColumn { name: "day" }));
}

#[tokio::test]
async fn first_invalid_row_aborts_with_its_line_number() {
    let repo = LocalRepository::new();
    // Header is line 1; the bad row is physical line 4.
    let csv = "day,start,end,program\n\
               1,06:00,07:00,Ok Satu\n\
               1,07:00,08:00,Ok Dua\n\
               1,8am,09:00,Broken\n\
               1,09:00,10:00,Never Reached\n";
    let err = import_grid(&repo, csv, ImportMode::Append).await.unwrap_err();
    assert_eq!(err.line(), Some(4));
    assert_eq!(err.code(), "INVALID_TIME");

    // Rows before the failure stay committed.
    let slots = list_grid(&repo).await.unwrap();
    let programs: Vec<&str> = slots.iter().map(|s| s.program.as_str()).collect();
    assert_eq!(programs, ["Ok Satu", "Ok Dua"]);
}

#[tokio::test]
async fn zero_length_row_aborts_import_at_its_line() {
    let repo = LocalRepository::new();
    // `end` equal to `start` is a duration failure, not a time-shape one.
    let csv = "day,start,end,program\n\
               2,08:00,09:00,Ok Dulu\n\
               2,09:00,09:00,Zero Length\n\
               2,10:00,11:00,Never Reached\n";
    let err = import_grid(&repo, csv, ImportMode::Append).await.unwrap_err();
    assert_eq!(err.code(), "NON_POSITIVE_DURATION");
    assert_eq!(err.line(), Some(3));

    let slots = list_grid(&repo).await.unwrap();
    let programs: Vec<&str> = slots.iter().map(|s| s.program.as_str()).collect();
    assert_eq!(programs, ["Ok Dulu"]);
}

#[tokio::test]
async fn out_of_range_hours_import_verbatim() {
    let repo = LocalRepository::new();
    let csv = "day,start,end,program\n6,23:00,25:00,Lintas Malam\n";
    let summary = import_grid(&repo, csv, ImportMode::Append).await.unwrap();
    assert_eq!(summary.inserted, 1);
    let slots = list_grid(&repo).await.unwrap();
    assert_eq!(slots[0].end.minutes(), 1500);
    assert_eq!(slots[0].end.to_string(), "25:00");
}

#[tokio::test]
async fn plain_export_round_trips_through_append_import() {
    let source = seeded_repo().await;
    let csv = export_grid(&source, ExportStyle::Plain).await.unwrap();

    let fresh = LocalRepository::new();
    let summary = import_grid(&fresh, &csv, ImportMode::Append).await.unwrap();
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.updated, 0);

    let original = list_grid(&source).await.unwrap();
    let reimported = list_grid(&fresh).await.unwrap();
    let strip = |slots: Vec<crate::models::Slot>| -> Vec<(u8, String, String, String, i32)> {
        slots
            .into_iter()
            .map(|s| {
                (
                    s.day.index(),
                    s.start.to_string(),
                    s.end.to_string(),
                    s.program,
                    s.sort_key,
                )
            })
            .collect()
    };
    assert_eq!(strip(original), strip(reimported));
}
