//! Minute-resolution clock times for grid slots.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::ValidationError;

/// A time-of-day with minute resolution, parsed from an `HH:MM` token.
///
/// Parsing checks the token *shape* only (two digits, colon, two digits) and
/// deliberately performs no numeric range check, so `"25:00"` parses to 1500
/// minutes. The station's grid has always stored such tokens verbatim;
/// operators use past-midnight hours for overnight programmes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Construct directly from a minute count.
    pub fn from_minutes(minutes: u16) -> Self {
        ClockTime(minutes)
    }

    /// Minutes since 00:00.
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Parse an `HH:MM` token (zero-padded, shape-checked only).
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        let bytes = token.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [bytes[0], bytes[1], bytes[3], bytes[4]]
                .iter()
                .all(u8::is_ascii_digit);
        if !well_formed {
            return Err(ValidationError::InvalidTime {
                token: token.to_string(),
            });
        }

        let hours = u16::from(bytes[0] - b'0') * 10 + u16::from(bytes[1] - b'0');
        let mins = u16::from(bytes[3] - b'0') * 10 + u16::from(bytes[4] - b'0');
        Ok(ClockTime(hours * 60 + mins))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ClockTime::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> String {
        time.to_string()
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
