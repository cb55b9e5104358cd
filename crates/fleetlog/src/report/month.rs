//! Portuguese (pt-BR) month labels used as report headings.

use chrono::{Locale, NaiveDate, NaiveTime};

/// Heading for a calendar month, e.g. `março de 2024`.
///
/// Falls back to `YYYY-MM` when `month` is not 1 to 12.
#[must_use]
pub fn month_label(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first
            .and_time(NaiveTime::MIN)
            .and_utc()
            .format_localized("%B de %Y", Locale::pt_BR)
            .to_string(),
        None => format!("{year}-{month:02}"),
    }
}
