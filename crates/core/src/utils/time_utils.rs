use chrono::{Datelike, NaiveDate, Weekday};

/// Returns true for Monday through Friday. Exchange holidays are not known
/// here; a holiday is simply cached as "no data" after one fetch.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

/// Weekdays in `[start, end]`, ascending.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    get_days_between(start, end)
        .into_iter()
        .filter(|d| is_business_day(*d))
        .collect()
}
