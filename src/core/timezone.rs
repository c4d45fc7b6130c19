use regex::Regex;
use std::sync::LazyLock;

use crate::error::ParseError;

/// Label prefix used by the survey for Greenwich itself
const GMT_MARKER: &str = "(GMT)";

/// Matches labels such as `(GMT-05:00) Eastern Time (US & Canada)`
static GMT_OFFSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(GMT\s*(?P<sign>[+-])(?P<hour>[0-9]+):.*\)").expect("valid GMT offset pattern")
});

/// Convert a time zone label into a whole-hour GMT offset
///
/// Only the hour digits are read, so `(GMT+05:30)` yields `5` and
/// `(GMT-03:30)` yields `-3`.
pub fn gmt_offset_hours(label: &str) -> Result<i32, ParseError> {
    if label.starts_with(GMT_MARKER) {
        return Ok(0);
    }

    let captures = GMT_OFFSET_REGEX
        .captures(label)
        .ok_or_else(|| ParseError::TimeZone(label.to_string()))?;

    let hours: i32 = captures["hour"]
        .parse()
        .map_err(|_| ParseError::TimeZone(label.to_string()))?;

    Ok(if &captures["sign"] == "-" { -hours } else { hours })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_gmt_is_zero() {
        assert_eq!(gmt_offset_hours("(GMT)"), Ok(0));
        assert_eq!(gmt_offset_hours("(GMT) Dublin, Edinburgh, Lisbon, London"), Ok(0));
    }

    #[test]
    fn test_signed_offsets() {
        assert_eq!(gmt_offset_hours("(GMT+01:00) Amsterdam, Berlin"), Ok(1));
        assert_eq!(gmt_offset_hours("(GMT-05:00) Eastern Time (US & Canada)"), Ok(-5));
        assert_eq!(gmt_offset_hours("(GMT+12:00) Auckland, Wellington"), Ok(12));
        assert_eq!(gmt_offset_hours("(GMT -8:00) Pacific"), Ok(-8));
    }

    #[test]
    fn test_minutes_are_ignored() {
        assert_eq!(gmt_offset_hours("(GMT+05:30) Chennai, Kolkata"), Ok(5));
        assert_eq!(gmt_offset_hours("(GMT-03:30) Newfoundland"), Ok(-3));
        assert_eq!(gmt_offset_hours("(GMT+00:30)"), Ok(0));
    }

    #[test]
    fn test_unrecognised_label() {
        assert_eq!(
            gmt_offset_hours("Eastern Standard Time"),
            Err(ParseError::TimeZone("Eastern Standard Time".to_string()))
        );
        assert!(gmt_offset_hours("").is_err());
        assert!(gmt_offset_hours("(GMT+5)").is_err());
        assert!(gmt_offset_hours("(UTC+05:00)").is_err());
    }

    #[test]
    fn test_oversized_hour_is_rejected() {
        assert!(gmt_offset_hours("(GMT+99999999999:00)").is_err());
    }
}
