//! Time helpers - business timezone conversion
//!
//! Report windows are built here from plain dates; repositories only ever
//! see UTC instants (stored as Unix millis).

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use shared::models::ReportWindow;
use shared::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Start of a date (00:00:00 in the business timezone) as a UTC instant
///
/// DST gap fallback: if the local midnight does not exist, fall back to UTC.
pub fn day_start(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// End of a date as the start of the following day (exclusive-bound idiom)
pub fn day_end(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let next = date.succ_opt().unwrap_or(date);
    day_start(next, tz)
}

/// Build a report window covering [start, end] (both dates inclusive)
pub fn window_from_dates(start: NaiveDate, end: NaiveDate, tz: Tz) -> AppResult<ReportWindow> {
    if end < start {
        return Err(AppError::validation(format!(
            "window end {} precedes start {}",
            end, start
        )));
    }
    Ok(ReportWindow::new(day_start(start, tz), day_end(end, tz)))
}
