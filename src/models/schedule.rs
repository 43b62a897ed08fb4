//! One-off broadcast schedule entries (dated announcements, distinct from the
//! recurring weekly grid).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque store-assigned schedule identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BroadcastId(String);

impl BroadcastId {
    pub fn new(id: impl Into<String>) -> Self {
        BroadcastId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BroadcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dated broadcast announcement with an absolute UTC time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastSchedule {
    pub id: BroadcastId,
    pub title: String,
    pub host: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    /// Intake guarantees `end_time > start_time`.
    pub end_time: DateTime<Utc>,
}

/// Intake fields for a new schedule entry; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastScheduleDraft {
    pub title: String,
    pub host: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
