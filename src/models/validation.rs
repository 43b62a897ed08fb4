//! Field-level validation errors shared across intake paths.
//!
//! Every operator-facing mutation (direct slot creation, CSV import, schedule
//! creation) funnels its field checks through these types so that the HTTP
//! layer can map each failure to a stable error code.

use std::fmt;

/// Validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A day token that is neither a recognized number nor a weekday name.
    #[error("unrecognized day token {token:?}")]
    InvalidDay { token: String },

    /// A time token that does not match the `HH:MM` shape.
    #[error("time token {token:?} does not match HH:MM")]
    InvalidTime { token: String },

    /// An interval whose end does not lie strictly after its start.
    #[error("end {end} must be strictly after start {start}")]
    NonPositiveDuration { start: String, end: String },

    /// A required field that is absent or blank.
    #[error("missing required field {name:?}")]
    MissingField { name: &'static str },
}

impl ValidationError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidDay { .. } => "INVALID_DAY",
            ValidationError::InvalidTime { .. } => "INVALID_TIME",
            ValidationError::NonPositiveDuration { .. } => "NON_POSITIVE_DURATION",
            ValidationError::MissingField { .. } => "MISSING_REQUIRED_FIELD",
        }
    }
}

/// Check that `end` lies strictly after `start`.
///
/// Works for any ordered, displayable time representation; the slot codec
/// calls it with minute-of-day clock times and the broadcast schedule
/// service with UTC timestamps.
pub fn check_interval<T>(start: T, end: T) -> Result<(), ValidationError>
where
    T: PartialOrd + fmt::Display,
{
    if end > start {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveDuration {
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}

/// Require a non-blank string field, returning its trimmed form.
pub fn require_field<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField { name })
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_accepts_strictly_increasing() {
        assert!(check_interval(10, 11).is_ok());
    }

    #[test]
    fn interval_rejects_equal_and_reversed() {
        assert!(matches!(
            check_interval(10, 10),
            Err(ValidationError::NonPositiveDuration { .. })
        ));
        assert!(matches!(
            check_interval(11, 10),
            Err(ValidationError::NonPositiveDuration { .. })
        ));
    }

    #[test]
    fn require_field_trims() {
        assert_eq!(require_field("program", "  Pagi Ceria  ").unwrap(), "Pagi Ceria");
        assert!(matches!(
            require_field("program", "   "),
            Err(ValidationError::MissingField { name: "program" })
        ));
    }

    #[test]
    fn codes_are_stable() {
        let err = ValidationError::InvalidDay { token: "x".into() };
        assert_eq!(err.code(), "INVALID_DAY");
    }
}
