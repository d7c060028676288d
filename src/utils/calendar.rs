use chrono::{Datelike, NaiveDate};

const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// 1-based position of the date inside its year. January 1st is day 1.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Last day of the month. `month_index` is 0-based, so January is 0 and December is 11.
pub fn days_in_month(year: i32, month_index: u32) -> u32 {
    match month_index {
        1 if is_leap_year(year) => 29,
        1 => 28,
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

pub fn weekday_abbrev(date: NaiveDate) -> &'static str {
    WEEKDAY_ABBREVIATIONS[date.weekday().num_days_from_sunday() as usize]
}
