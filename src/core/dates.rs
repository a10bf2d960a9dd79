use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Why a raw date string was rejected by [`parse_date_key`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("empty date string")]
    Empty,
    #[error("expected YYYY-MM-DD, found {0} part(s)")]
    WrongShape(usize),
    #[error("non-numeric date component {0:?}")]
    NotNumeric(String),
    #[error("{year}-{month}-{day} is not a calendar date")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

/// The leading `YYYY-MM-DD` of a raw date or date-time string.
///
/// Anything past the tenth character (time, zone) is dropped, so two
/// timestamps on the same calendar day always share a key.
pub fn date_key(raw: &str) -> &str {
    match raw.char_indices().nth(10) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

/// Strict parse of the date portion of `raw`.
///
/// The components are split literally and fed to a naive calendar date, so
/// the result never depends on the host's UTC offset.
pub fn parse_date_key(raw: &str) -> Result<NaiveDate, DateError> {
    let key = date_key(raw.trim_start());
    if key.is_empty() {
        return Err(DateError::Empty);
    }

    let parts: Vec<&str> = key.split('-').collect();
    if parts.len() != 3 {
        return Err(DateError::WrongShape(parts.len()));
    }

    let year: i32 = numeric_part(parts[0])?;
    let month: u32 = numeric_part(parts[1])?;
    let day: u32 = numeric_part(parts[2])?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::OutOfRange { year, month, day })
}

fn numeric_part<T: std::str::FromStr>(part: &str) -> Result<T, DateError> {
    let trimmed = part.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateError::NotNumeric(part.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| DateError::NotNumeric(part.to_string()))
}

/// Lenient variant of [`parse_date_key`]: `None` means "no date".
pub fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    parse_date_key(raw).ok()
}

pub fn start_of_day(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::MIN)
}

/// Monday at or before `at`, at midnight. A Sunday steps back six days.
pub fn start_of_week(at: NaiveDateTime) -> NaiveDateTime {
    let date = at.date();
    let back = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(back))
        .unwrap_or(date)
        .and_time(NaiveTime::MIN)
}

/// Sunday at or after `at`, at 23:59:59.999.
pub fn end_of_week(at: NaiveDateTime) -> NaiveDateTime {
    let monday = start_of_week(at).date();
    let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(monday);
    sunday.and_time(last_millisecond())
}

fn last_millisecond() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// Whether `date` falls in the Monday-to-Sunday week containing `reference`.
pub fn is_same_week(date: NaiveDate, reference: NaiveDate) -> bool {
    let reference = reference.and_time(NaiveTime::MIN);
    let at = date.and_time(NaiveTime::MIN);
    at >= start_of_week(reference) && at <= end_of_week(reference)
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn is_same_year(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year()
}

/// Strictly before `today`'s calendar day.
pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// `YYYY-MM-DD` from a 0-based month index. An out-of-range index gives a
/// key that matches no date.
pub fn format_date_key(year: i32, month_index: u32, day: u32) -> String {
    format!("{}-{:02}-{:02}", year, u64::from(month_index) + 1, day)
}

pub fn today_key(today: NaiveDate) -> String {
    format_date_key(today.year(), today.month0(), today.day())
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
