//! Weekday canonicalization.
//!
//! The grid stores days as indices 0..6 with Monday = 0 (the station broadcasts
//! on a Monday-first week). External inputs arrive in three shapes: 1-based
//! numbers (1 = Senin .. 7 = Minggu), 0-based numbers, and weekday names in
//! Indonesian or English. All of them resolve through [`Weekday::parse_token`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::ValidationError;

/// Indonesian weekday names, Monday first. Used for export and UI labels.
pub const DAY_NAMES_ID: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

/// English weekday names, Monday first.
pub const DAY_NAMES_EN: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// A canonical weekday index in `0..=6`, Monday = 0.
///
/// Serialized as the bare index; construction is validated so an in-range
/// value can be assumed everywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Weekday(u8);

impl Weekday {
    pub const MONDAY: Weekday = Weekday(0);
    pub const SUNDAY: Weekday = Weekday(6);

    /// All seven days, Monday first.
    pub fn all() -> impl Iterator<Item = Weekday> {
        (0u8..7).map(Weekday)
    }

    /// Canonical 0-based index (Monday = 0).
    pub fn index(self) -> u8 {
        self.0
    }

    /// 1-based day number (Monday = 1), the convention used in exports.
    pub fn one_based(self) -> u8 {
        self.0 + 1
    }

    /// Indonesian display name.
    pub fn name_id(self) -> &'static str {
        DAY_NAMES_ID[self.0 as usize]
    }

    /// English display name.
    pub fn name_en(self) -> &'static str {
        DAY_NAMES_EN[self.0 as usize]
    }

    /// Interpret a number in the 1-based convention (1 = Monday .. 7 = Sunday).
    pub fn from_one_based(n: i64) -> Option<Weekday> {
        match n {
            1..=7 => Some(Weekday((n - 1) as u8)),
            _ => None,
        }
    }

    /// Interpret a number in the 0-based convention (0 = Monday .. 6 = Sunday).
    pub fn from_zero_based(n: i64) -> Option<Weekday> {
        match n {
            0..=6 => Some(Weekday(n as u8)),
            _ => None,
        }
    }

    /// Resolve a weekday name, case-insensitively, in Indonesian or English.
    ///
    /// Accepts the common alternate spellings "jum'at" (Friday) and "ahad"
    /// (Sunday).
    pub fn from_name(name: &str) -> Option<Weekday> {
        let lowered = name.trim().to_lowercase();
        let idx = match lowered.as_str() {
            "senin" | "monday" => 0,
            "selasa" | "tuesday" => 1,
            "rabu" | "wednesday" => 2,
            "kamis" | "thursday" => 3,
            "jumat" | "jum'at" | "friday" => 4,
            "sabtu" | "saturday" => 5,
            "minggu" | "ahad" | "sunday" => 6,
            _ => return None,
        };
        Some(Weekday(idx))
    }

    /// Canonicalize any external day token.
    ///
    /// Numeric tokens try the 1-based convention first, then the 0-based one,
    /// so `"1"` means Monday and only `"0"` exercises the 0-based fallback.
    /// Non-numeric tokens resolve as names. Everything else is rejected with
    /// the raw token preserved for diagnostics.
    pub fn parse_token(token: &str) -> Result<Weekday, ValidationError> {
        let trimmed = token.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Weekday::from_one_based(n)
                .or_else(|| Weekday::from_zero_based(n))
                .ok_or_else(|| ValidationError::InvalidDay {
                    token: token.to_string(),
                });
        }
        Weekday::from_name(trimmed).ok_or_else(|| ValidationError::InvalidDay {
            token: token.to_string(),
        })
    }
}

impl TryFrom<u8> for Weekday {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 6 {
            Ok(Weekday(value))
        } else {
            Err(format!("day index out of range: {value}"))
        }
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> u8 {
        day.0
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_tokens_map_monday_first() {
        assert_eq!(Weekday::parse_token("1").unwrap().index(), 0);
        assert_eq!(Weekday::parse_token("7").unwrap().index(), 6);
    }

    #[test]
    fn zero_is_the_zero_based_fallback() {
        assert_eq!(Weekday::parse_token("0").unwrap().index(), 0);
    }

    #[test]
    fn every_numeric_token_lands_in_range() {
        for token in ["0", "1", "2", "3", "4", "5", "6", "7"] {
            let day = Weekday::parse_token(token).unwrap();
            assert!(day.index() <= 6, "token {token} out of range");
        }
    }

    #[test]
    fn names_resolve_in_both_languages() {
        assert_eq!(Weekday::parse_token("Senin").unwrap().index(), 0);
        assert_eq!(Weekday::parse_token("monday").unwrap().index(), 0);
        assert_eq!(Weekday::parse_token("KAMIS").unwrap().index(), 3);
        assert_eq!(Weekday::parse_token("Thursday").unwrap().index(), 3);
        assert_eq!(Weekday::parse_token("sabtu").unwrap().index(), 5);
    }

    #[test]
    fn alternate_spellings_for_friday_and_sunday() {
        assert_eq!(Weekday::parse_token("Jum'at").unwrap().index(), 4);
        assert_eq!(Weekday::parse_token("jumat").unwrap().index(), 4);
        assert_eq!(Weekday::parse_token("Ahad").unwrap().index(), 6);
        assert_eq!(Weekday::parse_token("minggu").unwrap().index(), 6);
    }

    #[test]
    fn garbage_tokens_carry_the_raw_input() {
        let err = Weekday::parse_token("8").unwrap_err();
        assert_eq!(err, ValidationError::InvalidDay { token: "8".into() });
        assert!(Weekday::parse_token("payday").is_err());
        assert!(Weekday::parse_token("").is_err());
        assert!(Weekday::parse_token("-1").is_err());
    }

    #[test]
    fn serde_rejects_out_of_range_index() {
        let ok: Weekday = serde_json::from_str("6").unwrap();
        assert_eq!(ok, Weekday::SUNDAY);
        assert!(serde_json::from_str::<Weekday>("7").is_err());
    }

    #[test]
    fn display_uses_station_language() {
        assert_eq!(Weekday::MONDAY.to_string(), "Senin");
        assert_eq!(Weekday::SUNDAY.name_en(), "Sunday");
    }
}
