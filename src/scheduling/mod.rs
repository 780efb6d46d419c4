//! Business-day scheduling.
//!
//! Everything here is pure: callers hand in a [`HolidayCalendar`] and the
//! current date, and get dates back. Loading the calendar and persisting the
//! results is the services' job.

pub mod business_days;
pub mod calendar;
pub mod milestones;
pub mod reminders;

pub use business_days::{add_business_days, is_business_day, is_weekend, next_business_day};
pub use calendar::{HolidayCalendar, HolidayRange, HolidayTable};
pub use milestones::{
    compute_milestones, MilestoneDates, Milestones, FIRST_FOLLOW_UP_OFFSET,
    SECOND_FOLLOW_UP_OFFSET,
};
pub use reminders::{day_window, select_due_reminders, FollowUpStage, ScheduledCall};

use crate::error::{CrmError, CrmResult};
use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` date coming from a request.
pub fn parse_date(input: &str) -> CrmResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| CrmError::InvalidDateInput(input.to_string()))
}
