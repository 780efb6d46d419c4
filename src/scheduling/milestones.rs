//! Contact milestone dates: creation, first follow-up, second follow-up.

use super::business_days::{add_business_days, next_business_day};
use super::calendar::HolidayCalendar;
use chrono::NaiveDate;
use serde::Serialize;

/// Business days between the creation date and the first follow-up.
pub const FIRST_FOLLOW_UP_OFFSET: u32 = 2;

/// Business days between the first and the second follow-up.
pub const SECOND_FOLLOW_UP_OFFSET: u32 = 4;

/// Milestone dates as currently set on a contact; any may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MilestoneDates {
    pub creation: Option<NaiveDate>,
    pub first_follow_up: Option<NaiveDate>,
    pub second_follow_up: Option<NaiveDate>,
}

/// Fully resolved milestone dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestones {
    pub creation: NaiveDate,
    pub first_follow_up: NaiveDate,
    pub second_follow_up: NaiveDate,
}

impl From<Milestones> for MilestoneDates {
    fn from(m: Milestones) -> Self {
        Self {
            creation: Some(m.creation),
            first_follow_up: Some(m.first_follow_up),
            second_follow_up: Some(m.second_follow_up),
        }
    }
}

/// Resolve the three milestones of a contact being saved.
///
/// `current` holds the dates on the record about to be written and `stored`
/// the dates of the persisted record (`None` when inserting). Each step sees
/// the result of the previous one:
///
/// 1. a missing creation date becomes the next business day from `today`;
/// 2. the first follow-up is recomputed when missing or when the creation
///    date differs from the stored one;
/// 3. the second follow-up is recomputed when missing or when the first
///    follow-up differs from the stored one.
///
/// A new record therefore always gets both follow-ups derived from its
/// creation date.
pub fn compute_milestones<C: HolidayCalendar + ?Sized>(
    calendar: &C,
    today: NaiveDate,
    current: MilestoneDates,
    stored: Option<MilestoneDates>,
) -> Milestones {
    let creation = current
        .creation
        .unwrap_or_else(|| next_business_day(calendar, today));

    let creation_changed = stored.map_or(true, |s| s.creation != Some(creation));
    let first_follow_up = match current.first_follow_up {
        Some(date) if !creation_changed => date,
        _ => add_business_days(calendar, creation, FIRST_FOLLOW_UP_OFFSET),
    };

    let first_changed = stored.map_or(true, |s| s.first_follow_up != Some(first_follow_up));
    let second_follow_up = match current.second_follow_up {
        Some(date) if !first_changed => date,
        _ => add_business_days(calendar, first_follow_up, SECOND_FOLLOW_UP_OFFSET),
    };

    Milestones {
        creation,
        first_follow_up,
        second_follow_up,
    }
}
