use async_trait::async_trait;
use chrono::NaiveDateTime;
use crm_followup_server::error::{CrmError, CrmResult};
use crm_followup_server::models::CallLog;
use crm_followup_server::repositories::CallLogRepository;
use std::sync::{Arc, Mutex};

/// Mock call log store for testing.
///
/// Inserted logs get a sequential name and a `creation` equal to their
/// start time.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockCallLogRepository {
    logs: Arc<Mutex<Vec<CallLog>>>,
    fail_inserts: Arc<Mutex<bool>>,
}

#[allow(dead_code)]
impl MockCallLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call to `contact` created at `at`.
    pub fn add_log(&self, log: CallLog, at: NaiveDateTime) {
        let mut log = log;
        log.creation = Some(at);
        self.logs.lock().unwrap().push(log);
    }

    pub fn logs(&self) -> Vec<CallLog> {
        self.logs.lock().unwrap().clone()
    }

    pub fn fail_inserts(&self) {
        *self.fail_inserts.lock().unwrap() = true;
    }
}

#[async_trait]
impl CallLogRepository for MockCallLogRepository {
    async fn insert(&self, log: &CallLog) -> CrmResult<CallLog> {
        if *self.fail_inserts.lock().unwrap() {
            return Err(CrmError::HttpError("Connection failed".to_string()));
        }

        let mut logs = self.logs.lock().unwrap();
        let mut saved = log.clone();
        saved.name = Some(format!("CL-{:04}", logs.len() + 1));
        saved.creation = Some(log.start_time);
        logs.push(saved.clone());
        Ok(saved)
    }

    async fn exists_for_contact_between(
        &self,
        contact: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> CrmResult<bool> {
        let logs = self.logs.lock().unwrap();
        Ok(logs.iter().any(|log| {
            log.reference_docname == contact
                && log
                    .creation
                    .is_some_and(|created| created >= start && created <= end)
        }))
    }
}
