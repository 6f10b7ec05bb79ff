//! Time parsing and validated windows.
//!
//! Workflow parameters carry timestamps as loosely formatted strings. This
//! module turns them into UTC instants or calendar dates:
//!
//! - RFC 3339 with an offset (`2025-09-16T09:00:00+02:00`) is taken as-is
//! - naive timestamps (`2025-09-16T09:00`, `2025-09-16 09:00:00.5`) are UTC
//! - a bare date (`2025-09-16`) is midnight UTC
//!
//! [`TimeWindow`] and [`DateWindow`] can only be built with an end strictly
//! after the start.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rooms_core::{ActionError, Outcome};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parses an instant, assuming UTC for naive values.
///
/// `field` names the parameter in error messages.
pub fn parse_instant(field: &str, raw: &str) -> Outcome<DateTime<Utc>> {
    let value = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = parse_date(field, value) {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    Err(ActionError::invalid_parameter(format!(
        "{} is not a valid timestamp: '{}'",
        field, raw
    )))
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(field: &str, raw: &str) -> Outcome<NaiveDate> {
    let value = raw.trim();
    let shaped = value.len() == 10
        && value
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });
    let invalid = || {
        ActionError::invalid_parameter(format!(
            "{} must be a YYYY-MM-DD date, got '{}'",
            field, raw
        ))
    };
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

/// Formats an instant as RFC 3339 with a `Z` suffix.
pub fn to_rfc3339_z(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// A half-open range of instants with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window, rejecting empty or inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Outcome<Self> {
        if end <= start {
            return Err(ActionError::invalid_time_range(format!(
                "end ({}) must be after start ({})",
                to_rfc3339_z(&end),
                to_rfc3339_z(&start)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds and builds the window.
    pub fn parse(start_field: &str, start: &str, end_field: &str, end: &str) -> Outcome<Self> {
        let start = parse_instant(start_field, start)?;
        let end = parse_instant(end_field, end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// An all-day range; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Creates a window, rejecting empty or inverted ranges.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Outcome<Self> {
        if end <= start {
            return Err(ActionError::invalid_time_range(format!(
                "end_date ({}) must be after start_date ({}); end is exclusive",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// The window of an event to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventWindow {
    Timed(TimeWindow),
    AllDay(DateWindow),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rooms_core::ErrorKind;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn parses_rfc3339() {
        assert_eq!(
            parse_instant("timeMin", "2025-09-16T00:00:00Z").unwrap(),
            utc(2025, 9, 16, 0, 0, 0)
        );
        assert_eq!(
            parse_instant("timeMin", "2025-09-16T09:00:00+02:00").unwrap(),
            utc(2025, 9, 16, 7, 0, 0)
        );
    }

    #[test]
    fn naive_values_are_utc() {
        assert_eq!(
            parse_instant("t", "2025-09-16T09:30:00").unwrap(),
            utc(2025, 9, 16, 9, 30, 0)
        );
        assert_eq!(
            parse_instant("t", "2025-09-16T09:30").unwrap(),
            utc(2025, 9, 16, 9, 30, 0)
        );
        assert_eq!(
            parse_instant("t", "2025-09-16 09:30:15").unwrap(),
            utc(2025, 9, 16, 9, 30, 15)
        );
        assert_eq!(
            parse_instant("t", "2025-09-16").unwrap(),
            utc(2025, 9, 16, 0, 0, 0)
        );
    }

    #[test]
    fn compact_offset() {
        assert_eq!(
            parse_instant("t", "2025-09-16T09:00:00+0200").unwrap(),
            utc(2025, 9, 16, 7, 0, 0)
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_instant("timeMin", "next tuesday").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(err.message().contains("timeMin"));
        assert!(parse_instant("t", "2025-13-01T00:00:00Z").is_err());
    }

    #[test]
    fn strict_dates() {
        assert_eq!(
            parse_date("start_date", "2025-09-17").unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 17).unwrap()
        );
        assert!(parse_date("d", "2025-9-17").is_err());
        assert!(parse_date("d", "2025-09-17T00:00:00").is_err());
        assert!(parse_date("d", "2025-02-30").is_err());
    }

    #[test]
    fn formats_with_z() {
        assert_eq!(to_rfc3339_z(&utc(2025, 9, 20, 23, 59, 59)), "2025-09-20T23:59:59Z");
    }

    #[test]
    fn windows_must_be_increasing() {
        let a = utc(2025, 9, 16, 0, 0, 0);
        let b = utc(2025, 9, 20, 0, 0, 0);
        assert!(TimeWindow::new(a, b).is_ok());
        assert_eq!(
            TimeWindow::new(b, a).unwrap_err().kind(),
            ErrorKind::InvalidTimeRange
        );
        assert_eq!(
            TimeWindow::new(a, a).unwrap_err().kind(),
            ErrorKind::InvalidTimeRange
        );

        let d1 = NaiveDate::from_ymd_opt(2025, 9, 17).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 9, 18).unwrap();
        let window = DateWindow::new(d1, d2).unwrap();
        assert_eq!((window.start(), window.end()), (d1, d2));
        assert_eq!(
            DateWindow::new(d1, d1).unwrap_err().kind(),
            ErrorKind::InvalidTimeRange
        );
    }

    #[test]
    fn parse_window_reports_bad_bound() {
        let err = TimeWindow::parse("start_dt", "nope", "end_dt", "2025-09-16T10:00:00Z")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(err.message().contains("start_dt"));
    }
}
