use super::ClockTime;
use crate::models::validation::ValidationError;

#[test]
fn parses_zero_padded_tokens() {
    assert_eq!(ClockTime::parse("09:05").unwrap().minutes(), 545);
    assert_eq!(ClockTime::parse("00:00").unwrap().minutes(), 0);
    assert_eq!(ClockTime::parse("23:59").unwrap().minutes(), 1439);
}

#[test]
fn rejects_unpadded_tokens() {
    let err = ClockTime::parse("9:5").unwrap_err();
    assert_eq!(err, ValidationError::InvalidTime { token: "9:5".into() });
    assert!(ClockTime::parse("9:05").is_err());
    assert!(ClockTime::parse("09:5").is_err());
}

#[test]
fn rejects_non_time_shapes() {
    assert!(ClockTime::parse("").is_err());
    assert!(ClockTime::parse("09-05").is_err());
    assert!(ClockTime::parse("ab:cd").is_err());
    assert!(ClockTime::parse("09:055").is_err());
    assert!(ClockTime::parse(" 09:05").is_err());
}

#[test]
fn out_of_range_hours_are_accepted_verbatim() {
    // Shape-only parsing is intentional; overnight programmes use hour 24+.
    assert_eq!(ClockTime::parse("25:00").unwrap().minutes(), 1500);
    assert_eq!(ClockTime::parse("25:00").unwrap().to_string(), "25:00");
}

#[test]
fn display_round_trips() {
    for token in ["00:00", "06:30", "12:00", "19:45", "23:59"] {
        assert_eq!(ClockTime::parse(token).unwrap().to_string(), token);
    }
}

#[test]
fn serde_uses_the_token_form() {
    let time: ClockTime = serde_json::from_str("\"07:15\"").unwrap();
    assert_eq!(time.minutes(), 435);
    assert_eq!(serde_json::to_string(&time).unwrap(), "\"07:15\"");
    assert!(serde_json::from_str::<ClockTime>("\"7:15\"").is_err());
}

#[test]
fn ordering_follows_minutes() {
    let a = ClockTime::parse("08:00").unwrap();
    let b = ClockTime::parse("08:01").unwrap();
    assert!(a < b);
}
