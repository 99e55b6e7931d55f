use chrono::{Datelike, Days, NaiveDate, Weekday};

pub struct TimeUtils;

impl TimeUtils {
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Step forward one calendar day at a time, counting only Monday-Friday,
/// until `days` weekdays have been counted. Holidays are not considered.
///
/// `add_business_days(friday, 1)` is the following Monday; `days == 0`
/// returns `start` unchanged, even if `start` itself is a weekend.
/// `None` when the result falls past the last representable date.
pub fn add_business_days(start: NaiveDate, days: u32) -> Option<NaiveDate> {
    if days == 0 {
        return Some(start);
    }

    // From a weekend, counting starts as if from the Friday before
    let mut current = match start.weekday() {
        Weekday::Sat => start.checked_sub_days(Days::new(1))?,
        Weekday::Sun => start.checked_sub_days(Days::new(2))?,
        _ => start,
    };

    // Every five weekdays from a weekday is one calendar week
    current = current.checked_add_days(Days::new(u64::from(days / 5) * 7))?;
    let mut added = 0;
    while added < days % 5 {
        current = current.checked_add_days(Days::new(1))?;
        if !is_weekend(current) {
            added += 1;
        }
    }
    Some(current)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}
