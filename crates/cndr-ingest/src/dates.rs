//! Calendar-date parsing for the typed date columns.

use chrono::{NaiveDate, NaiveDateTime};

use cndr_model::columns;

/// Columns loaded as calendar dates.
pub const DATE_COLUMNS: [&str; 2] = [columns::FLYWHEEL_SESSION_DATE, columns::AUTOPSY_DATE];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Parses a date cell; the time part of a timestamp is dropped.
///
/// Returns `None` for anything that is not a recognised spelling.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .map(|dt| dt.date())
            })
        })
}
