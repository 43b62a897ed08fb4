//! Weekly grid slot records.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::day::Weekday;
use super::time::ClockTime;

/// Opaque store-assigned slot identifier, round-trippable as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        SlotId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scheduled programme occurrence in the recurring weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Store-assigned identifier; immutable once created.
    pub id: SlotId,
    /// Weekday of the slot, Monday = 0.
    pub day: Weekday,
    /// Start of the slot.
    pub start: ClockTime,
    /// End of the slot; intake guarantees `end > start`.
    pub end: ClockTime,
    /// Programme display name, non-empty at intake.
    pub program: String,
    /// Free-form track list / notes, may be empty.
    pub tracks: String,
    /// Within-day display order; sole order key, rewritten by reorder.
    pub sort_key: i32,
}

impl Slot {
    /// Grid display order: day, then sort key, then start as the tie-break
    /// for rows that never went through the append path.
    pub fn grid_cmp(&self, other: &Slot) -> Ordering {
        self.day
            .cmp(&other.day)
            .then(self.sort_key.cmp(&other.sort_key))
            .then(self.start.cmp(&other.start))
    }
}

/// Field set for inserting or upserting a slot; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDraft {
    pub day: Weekday,
    pub start: ClockTime,
    pub end: ClockTime,
    pub program: String,
    pub tracks: String,
    pub sort_key: i32,
}

/// Partial update of a stored slot; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotChanges {
    pub day: Option<Weekday>,
    pub start: Option<ClockTime>,
    pub end: Option<ClockTime>,
    pub program: Option<String>,
    pub tracks: Option<String>,
    pub sort_key: Option<i32>,
}

impl SlotChanges {
    /// The change set a reorder applies: new day and position only.
    pub fn reposition(day: Weekday, sort_key: i32) -> Self {
        SlotChanges {
            day: Some(day),
            sort_key: Some(sort_key),
            ..Default::default()
        }
    }

    /// Apply the change set to a stored record.
    pub fn apply_to(self, slot: &mut Slot) {
        if let Some(day) = self.day {
            slot.day = day;
        }
        if let Some(start) = self.start {
            slot.start = start;
        }
        if let Some(end) = self.end {
            slot.end = end;
        }
        if let Some(program) = self.program {
            slot.program = program;
        }
        if let Some(tracks) = self.tracks {
            slot.tracks = tracks;
        }
        if let Some(sort_key) = self.sort_key {
            slot.sort_key = sort_key;
        }
    }
}
