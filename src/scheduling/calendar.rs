//! Holiday calendar.

use crate::models::HolidayList;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Read-only source of holiday information.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

impl<C: HolidayCalendar + ?Sized> HolidayCalendar for &C {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }
}

impl<C: HolidayCalendar + ?Sized> HolidayCalendar for Arc<C> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }
}

/// One holiday list: a date window and the holidays declared for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayRange {
    pub name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub dates: BTreeSet<NaiveDate>,
}

impl HolidayRange {
    pub fn new(
        name: impl Into<String>,
        from_date: NaiveDate,
        to_date: NaiveDate,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            name: name.into(),
            from_date,
            to_date,
            dates: dates.into_iter().collect(),
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from_date <= date && date <= self.to_date
    }

    /// Convert a stored list. Lists without a complete window are unusable
    /// and yield `None`; holiday rows without a date are skipped.
    pub fn from_list(list: &HolidayList) -> Option<Self> {
        let from_date = list.from_date?;
        let to_date = list.to_date?;
        Some(Self::new(
            list.name.clone(),
            from_date,
            to_date,
            list.holidays.iter().filter_map(|h| h.date),
        ))
    }
}

/// The holiday lists in lookup order.
///
/// When windows overlap, the first list whose window covers a date decides
/// for that date, even if a later list names it as a holiday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayTable {
    ranges: Vec<HolidayRange>,
}

impl HolidayTable {
    pub fn new(ranges: Vec<HolidayRange>) -> Self {
        Self { ranges }
    }

    pub fn from_lists(lists: &[HolidayList]) -> Self {
        let ranges = lists
            .iter()
            .filter_map(|list| {
                let range = HolidayRange::from_list(list);
                if range.is_none() {
                    tracing::warn!(list = %list.name, "Skipping holiday list without a date window");
                }
                range
            })
            .collect();
        Self { ranges }
    }

    pub fn ranges(&self) -> &[HolidayRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// First range whose window contains `date`.
    pub fn covering_range(&self, date: NaiveDate) -> Option<&HolidayRange> {
        self.ranges.iter().find(|range| range.covers(date))
    }
}

impl HolidayCalendar for HolidayTable {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.covering_range(date)
            .map(|range| range.dates.contains(&date))
            .unwrap_or(false)
    }
}
