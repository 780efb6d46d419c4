//! Weekday and holiday aware date stepping.

use super::calendar::HolidayCalendar;
use chrono::{Datelike, NaiveDate, Weekday};

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Not Saturday, not Sunday and not a holiday.
pub fn is_business_day<C: HolidayCalendar + ?Sized>(calendar: &C, date: NaiveDate) -> bool {
    !is_weekend(date) && !calendar.is_holiday(date)
}

/// `date` itself when it is a business day, otherwise the first business day
/// after it.
///
/// Stops at the last representable date if the calendar never yields a
/// business day.
pub fn next_business_day<C: HolidayCalendar + ?Sized>(calendar: &C, date: NaiveDate) -> NaiveDate {
    let mut current = date;
    while !is_business_day(calendar, current) {
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

/// The date reached after counting `days` business days forward from `date`.
///
/// `date` itself is never counted; the first candidate is the day after.
/// Weekend days and holidays are stepped over without being counted.
pub fn add_business_days<C: HolidayCalendar + ?Sized>(
    calendar: &C,
    date: NaiveDate,
    days: u32,
) -> NaiveDate {
    let mut current = date;
    let mut remaining = days;
    while remaining > 0 {
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if is_business_day(calendar, current) {
            remaining -= 1;
        }
    }
    current
}
