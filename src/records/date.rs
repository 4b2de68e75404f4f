//! Calendar date parsing for the human-entered date columns.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

static DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

static DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

static MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parses a date in any of the layouts seen in the survey exports, keeping
/// only the calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parses a monthly label such as `"Jun-25"` or `"Jun 2025"` to the first of
/// that month. Two-digit years are taken as 20xx.
pub fn parse_month_year(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let sep = if s.contains('-') { '-' } else { ' ' };
    let mut parts = s.split(sep).filter(|p| !p.is_empty());

    let month_str = parts.next()?;
    let year_str = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let prefix = month_str.get(..3)?.to_ascii_lowercase();
    let month = MONTHS.iter().position(|m| *m == prefix)? as u32 + 1;

    let mut year: i32 = year_str.trim().parse().ok()?;
    if year < 100 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Date of an aggregate row: monthly label first, then any full date.
pub fn parse_aggregate_date(s: &str) -> Option<NaiveDate> {
    parse_month_year(s).or_else(|| parse_date(s))
}
