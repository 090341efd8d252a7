//! Time module for astronomical time calculations
//!
//! Instants are UTC `chrono` date-times. The orbit model runs on Julian dates,
//! counted from J2000.0; the bundled reference dataset keys its rows with a
//! compact `YYYY.MMDD` day string.

pub mod calendar;

use crate::constants::{DAY_S, J2000};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use thiserror::Error;

/// Error type for time operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}

/// Result type for time operations
pub type Result<T> = std::result::Result<T, TimeError>;

/// Julian date of a UTC instant (proleptic Gregorian calendar)
///
/// The integer day number comes from [`calendar::compute_julian_day`], the
/// fraction from the time of day including sub-second precision.
pub fn julian_date(instant: &DateTime<Utc>) -> f64 {
    let jdn = calendar::compute_julian_day(instant.year(), instant.month(), instant.day());
    let seconds = instant.num_seconds_from_midnight() as f64
        + instant.timestamp_subsec_nanos() as f64 * 1e-9;
    jdn as f64 - 0.5 + seconds / DAY_S
}

/// Days elapsed since the J2000.0 epoch (JD 2451545.0)
pub fn days_since_epoch(instant: &DateTime<Utc>) -> f64 {
    julian_date(instant) - J2000
}

/// Parse a `YYYY.MMDD` reference date into midnight UTC of that day
pub fn parse_reference_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 9
        && bytes[4] == b'.'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_digit());
    if !well_formed {
        return Err(TimeError::InvalidFormat(format!(
            "expected YYYY.MMDD, got {:?}",
            s
        )));
    }

    let year: i32 = s[0..4].parse().map_err(|_| bad_date(s))?;
    let month: u32 = s[5..7].parse().map_err(|_| bad_date(s))?;
    let day: u32 = s[7..9].parse().map_err(|_| bad_date(s))?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| bad_date(s))?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| bad_date(s))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

fn bad_date(s: &str) -> TimeError {
    TimeError::InvalidFormat(format!("not a calendar date: {:?}", s))
}

/// Format the UTC day of an instant as `YYYY.MMDD`; the time of day is dropped
pub fn format_reference_date(instant: &DateTime<Utc>) -> String {
    format!(
        "{:04}.{:02}{:02}",
        instant.year(),
        instant.month(),
        instant.day()
    )
}

/// Midnight UTC at the start of an instant's calendar day
pub fn start_of_day(instant: &DateTime<Utc>) -> DateTime<Utc> {
    let midnight = instant.date_naive().and_time(chrono::NaiveTime::MIN);
    Utc.from_utc_datetime(&midnight)
}
