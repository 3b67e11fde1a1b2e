//! Lenient timestamp parsing for `--at` style flags.

use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parse a user-supplied point in time.
///
/// Accepted forms, tried in order: full RFC 3339, local datetime
/// (`YYYY-MM-DDTHH:MM`), and date-only (`YYYY-MM-DD`, midnight local
/// time).
pub fn parse_time(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(t) = DateTime::parse_from_rfc3339(input) {
        return Ok(t.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        if let Some(t) = naive.and_local_timezone(Local).latest() {
            return Ok(t.with_timezone(&Utc));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let naive = date.and_time(NaiveTime::MIN);
        if let Some(t) = naive.and_local_timezone(Local).latest() {
            return Ok(t.with_timezone(&Utc));
        }
    }

    bail!("invalid time format, use RFC 3339, YYYY-MM-DDTHH:MM, or YYYY-MM-DD")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let t = parse_time("2026-01-09T23:59:59+05:30").unwrap();
        assert_eq!(t.to_rfc3339(), "2026-01-09T18:29:59+00:00");
    }

    #[test]
    fn test_parse_local_forms() {
        assert!(parse_time("2026-01-09T21:30").is_ok());
        assert!(parse_time("2026-01-09").is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_time("yesterday").is_err());
        assert!(parse_time("").is_err());
    }
}
