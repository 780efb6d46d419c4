//! Holiday calendar service.
//!
//! Loads the holiday lists once per TTL and hands out an immutable
//! [`HolidayTable`] for the scheduling functions to read.

use crate::cache::TimedCache;
use crate::error::{CrmError, CrmResult};
use crate::repositories::HolidayRepository;
use crate::scheduling::{self, HolidayTable};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

const CALENDAR_KEY: &str = "holiday_calendar";

#[async_trait]
pub trait CalendarService: Send + Sync {
    /// The current holiday calendar.
    ///
    /// Fails with `HolidayLookupFailure` when the lists cannot be read.
    async fn calendar(&self) -> CrmResult<Arc<HolidayTable>>;

    async fn is_business_day(&self, date: NaiveDate) -> CrmResult<bool>;

    /// Drop the cached calendar so the next call reloads it.
    fn invalidate(&self);
}

pub struct CalendarServiceImpl {
    holidays: Arc<dyn HolidayRepository>,
    cache: TimedCache<&'static str, Arc<HolidayTable>>,
}

impl CalendarServiceImpl {
    pub fn new(holidays: Arc<dyn HolidayRepository>, ttl_minutes: u64) -> Self {
        Self {
            holidays,
            cache: TimedCache::from_minutes(ttl_minutes),
        }
    }

    async fn load(&self) -> CrmResult<Arc<HolidayTable>> {
        let lists = self
            .holidays
            .list_holiday_lists()
            .await
            .map_err(|e| CrmError::HolidayLookupFailure(e.to_string()))?;
        let table = HolidayTable::from_lists(&lists);
        tracing::info!("Holiday calendar loaded with {} ranges", table.ranges().len());
        Ok(Arc::new(table))
    }
}

#[async_trait]
impl CalendarService for CalendarServiceImpl {
    async fn calendar(&self) -> CrmResult<Arc<HolidayTable>> {
        self.cache
            .get_or_try_insert_with(CALENDAR_KEY, || self.load())
            .await
    }

    async fn is_business_day(&self, date: NaiveDate) -> CrmResult<bool> {
        let calendar = self.calendar().await?;
        Ok(scheduling::is_business_day(calendar.as_ref(), date))
    }

    fn invalidate(&self) {
        self.cache.clear();
    }
}
