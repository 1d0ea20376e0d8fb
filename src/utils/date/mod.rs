// Date utility functions

use chrono::{Datelike, Local, NaiveDate, Weekday};

/// Previous calendar day, or `None` at the start of chrono's range.
pub fn previous_day(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

/// Next calendar day, or `None` at the end of chrono's range.
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

/// Pulls `date` one day inward from chrono's representable bounds so that
/// both of its neighbours exist.
pub fn clamp_to_paged_range(date: NaiveDate) -> NaiveDate {
    if date.pred_opt().is_none() {
        date.succ_opt().unwrap_or(date)
    } else if date.succ_opt().is_none() {
        date.pred_opt().unwrap_or(date)
    } else {
        date
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// "Saturday" style heading for a day page.
pub fn day_heading(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// "June 15, 2024" style subtitle for a day page.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}
