//! Weekly playlist grid operations.
//!
//! All intake goes through [`SlotInput::validate`], so a slot that reaches a
//! repository is guaranteed to have a canonical day, well-formed times, a
//! positive duration and a non-empty programme name.

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{
    check_interval, require_field, ClockTime, Slot, SlotChanges, SlotDraft, SlotId,
    ValidationError, Weekday,
};

use super::ServiceResult;

/// Raw operator input for creating or editing one slot.
///
/// Fields carry the exact tokens the client sent; nothing is canonicalized
/// until [`SlotInput::validate`] runs.
#[derive(Debug, Clone, Default)]
pub struct SlotInput {
    pub day: String,
    pub start: String,
    pub end: String,
    pub program: String,
    pub tracks: String,
}

/// A validated slot, ready for storage once a sort key is chosen.
#[derive(Debug, Clone)]
pub struct ValidatedSlot {
    pub day: Weekday,
    pub start: ClockTime,
    pub end: ClockTime,
    pub program: String,
    pub tracks: String,
}

impl SlotInput {
    /// Validate all fields, in the fixed order day, start, end, interval,
    /// program. The first failure wins; later fields are not inspected.
    pub fn validate(&self) -> Result<ValidatedSlot, ValidationError> {
        let day = Weekday::parse_token(&self.day)?;
        let start = ClockTime::parse(self.start.trim())?;
        let end = ClockTime::parse(self.end.trim())?;
        check_interval(start, end)?;
        let program = require_field("program", &self.program)?.to_string();

        Ok(ValidatedSlot {
            day,
            start,
            end,
            program,
            tracks: normalize_tracks(&self.tracks),
        })
    }
}

impl ValidatedSlot {
    fn into_draft(self, sort_key: i32) -> SlotDraft {
        SlotDraft {
            day: self.day,
            start: self.start,
            end: self.end,
            program: self.program,
            tracks: self.tracks,
            sort_key,
        }
    }
}

/// Collapse Windows line endings in the free-form track list.
pub fn normalize_tracks(tracks: &str) -> String {
    tracks.replace("\r\n", "\n").trim().to_string()
}

/// Validate and append one slot at the end of its day.
///
/// The sort key is the day's current maximum plus one, so appends always land
/// after every existing slot of that day regardless of their start times.
pub async fn append_slot(repo: &dyn FullRepository, input: &SlotInput) -> ServiceResult<Slot> {
    let validated = input.validate()?;
    let day = validated.day;
    let sort_key = repo.max_sort_key(day).await? + 1;
    let draft = validated.into_draft(sort_key);
    let id = repo.insert_slot(draft.clone()).await?;

    Ok(Slot {
        id,
        day: draft.day,
        start: draft.start,
        end: draft.end,
        program: draft.program,
        tracks: draft.tracks,
        sort_key: draft.sort_key,
    })
}

/// Validate and update one slot's content fields, keeping its position.
pub async fn edit_slot(
    repo: &dyn FullRepository,
    id: &SlotId,
    input: &SlotInput,
) -> ServiceResult<()> {
    let validated = input.validate()?;
    let changes = SlotChanges {
        day: Some(validated.day),
        start: Some(validated.start),
        end: Some(validated.end),
        program: Some(validated.program),
        tracks: Some(validated.tracks),
        sort_key: None,
    };
    repo.update_slot(id, changes).await?;
    Ok(())
}

/// Delete one slot.
pub async fn remove_slot(repo: &dyn FullRepository, id: &SlotId) -> ServiceResult<()> {
    repo.delete_slot(id).await?;
    Ok(())
}

/// The whole grid in display order: day asc, then within-day position.
pub async fn list_grid(repo: &dyn FullRepository) -> RepositoryResult<Vec<Slot>> {
    repo.list_slots().await
}

/// One day of the grid in display order.
pub async fn list_day(repo: &dyn FullRepository, day: Weekday) -> RepositoryResult<Vec<Slot>> {
    repo.list_slots_by_day(day).await
}

/// Rewrite a day's ordering from an explicit id sequence.
///
/// Every listed slot is moved to `day` and given its index in `ids` as the
/// new sort key. Ids that no longer resolve are skipped silently so a stale
/// drag-and-drop payload cannot fail the whole reorder. Returns the number of
/// ids attempted, not the number moved.
pub async fn reorder_day(
    repo: &dyn FullRepository,
    day: Weekday,
    ids: &[SlotId],
) -> ServiceResult<usize> {
    for (position, id) in ids.iter().enumerate() {
        let changes = SlotChanges::reposition(day, position as i32);
        match repo.update_slot(id, changes).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                log::debug!("reorder skipping stale slot id {}", id);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(ids.len())
}

#[cfg(test)]
#[path = "playlist_tests.rs"]
mod playlist_tests;
