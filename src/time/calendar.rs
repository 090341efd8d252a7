//! Calendar date and Julian day conversion functions
//!
//! Integer arithmetic only, proleptic Gregorian calendar throughout.

/// Convert Julian day integer to calendar date (year, month, day)
pub fn compute_calendar_date(jd_integer: i64) -> (i32, u32, u32) {
    // See the Explanatory Supplement to the Astronomical Almanac 15.11.
    let f = jd_integer + 1401 + ((4 * jd_integer + 274277) / 146097 * 3 / 4 - 38);
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;
    let day = (h % 153) / 5 + 1;
    let month = (h / 153 + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;

    (year as i32, month as u32, day as u32)
}

/// Convert (year, month, day) to the Julian day number beginning at noon
pub fn compute_julian_day(year: i32, month: u32, day: u32) -> i64 {
    let (year, month, day) = (year as i64, month as i64, day as i64);
    let janfeb = if month < 3 { 1 } else { 0 };

    1461 * (year + 4800 - janfeb) / 4 + 367 * (month - 2 + 12 * janfeb) / 12
        - 3 * ((year + 4900 - janfeb) / 100) / 4
        - 32075
        + day
}

/// Format a Julian date as a calendar date string (YYYY-MM-DD)
pub fn format_date(jd: f64) -> String {
    let (year, month, day) = compute_calendar_date((jd + 0.5).floor() as i64);
    format!("{:04}-{:02}-{:02}", year, month, day)
}
