//! Listener song requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque store-assigned request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        RequestId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workflow state of a song request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    New,
    #[serde(rename = "In-Progress")]
    InProgress,
    Done,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::New => "New",
            RequestStatus::InProgress => "In-Progress",
            RequestStatus::Done => "Done",
        };
        f.write_str(s)
    }
}

/// A listener's song request as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRequest {
    pub id: RequestId,
    pub name: String,
    pub title: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Intake fields for a new request; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRequestDraft {
    pub name: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_with_dashed_form() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::InProgress).unwrap(),
            "\"In-Progress\""
        );
        let parsed: RequestStatus = serde_json::from_str("\"In-Progress\"").unwrap();
        assert_eq!(parsed, RequestStatus::InProgress);
        assert!(serde_json::from_str::<RequestStatus>("\"Stalled\"").is_err());
    }
}
