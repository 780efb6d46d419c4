use async_trait::async_trait;
use crm_followup_server::error::{CrmError, CrmResult};
use crm_followup_server::models::HolidayList;
use crm_followup_server::repositories::HolidayRepository;
use std::sync::{Arc, Mutex};

/// Mock holiday list source for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockHolidayRepository {
    lists: Arc<Mutex<Vec<HolidayList>>>,
    failing: Arc<Mutex<bool>>,
    loads: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl MockHolidayRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lists(lists: Vec<HolidayList>) -> Self {
        let repo = Self::default();
        *repo.lists.lock().unwrap() = lists;
        repo
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// How many times the lists were read.
    pub fn load_count(&self) -> usize {
        *self.loads.lock().unwrap()
    }
}

#[async_trait]
impl HolidayRepository for MockHolidayRepository {
    async fn list_holiday_lists(&self) -> CrmResult<Vec<HolidayList>> {
        *self.loads.lock().unwrap() += 1;
        if *self.failing.lock().unwrap() {
            return Err(CrmError::Timeout);
        }
        Ok(self.lists.lock().unwrap().clone())
    }
}
