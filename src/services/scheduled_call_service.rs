//! Scheduled call reminders and call outcome logging.

use crate::domain::DocName;
use crate::error::CrmResult;
use crate::events::{EventPublisher, RealtimeEvent};
use crate::models::{ApiResponse, CallLog, CallStatus};
use crate::repositories::{CallLogRepository, ContactRepository};
use crate::scheduling::{day_window, select_due_reminders, ScheduledCall};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Length of the `id` given to new call logs.
const CALL_LOG_ID_LEN: usize = 12;

#[async_trait]
pub trait ScheduledCallService: Send + Sync {
    /// Contacts due for a call on `today` that have not been called yet today.
    async fn list_due_reminders(&self, today: NaiveDate) -> CrmResult<Vec<ScheduledCall>>;

    /// Log a call outcome for `contact` and notify listeners.
    ///
    /// Never fails: errors come back as an error envelope.
    async fn mark_call_status(
        &self,
        contact: &str,
        status: &str,
        now: NaiveDateTime,
    ) -> ApiResponse<()>;
}

pub struct ScheduledCallServiceImpl {
    contacts: Arc<dyn ContactRepository>,
    call_logs: Arc<dyn CallLogRepository>,
    events: Arc<dyn EventPublisher>,
    session_user: String,
}

impl ScheduledCallServiceImpl {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        call_logs: Arc<dyn CallLogRepository>,
        events: Arc<dyn EventPublisher>,
        session_user: impl Into<String>,
    ) -> Self {
        Self {
            contacts,
            call_logs,
            events,
            session_user: session_user.into(),
        }
    }

    fn new_call_log_id() -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(CALL_LOG_ID_LEN);
        id
    }

    async fn log_call(
        &self,
        contact: &str,
        status: &str,
        now: NaiveDateTime,
    ) -> CrmResult<CallStatus> {
        let contact = DocName::new(contact)?;
        let status: CallStatus = status.parse()?;

        let log = CallLog::outgoing_to_contact(
            Self::new_call_log_id(),
            self.session_user.as_str(),
            contact.as_str(),
            status,
            now,
        );
        let saved = self.call_logs.insert(&log).await?;
        tracing::info!(contact = %contact, status = %status, call_log = ?saved.name, "Call logged");

        self.events.publish(RealtimeEvent::scheduled_call_updated(
            contact.as_str(),
            status.as_str(),
        ));
        Ok(status)
    }
}

#[async_trait]
impl ScheduledCallService for ScheduledCallServiceImpl {
    async fn list_due_reminders(&self, today: NaiveDate) -> CrmResult<Vec<ScheduledCall>> {
        let candidates = self.contacts.find_due_on(today).await?;
        let (start, end) = day_window(today);

        let checks = candidates.iter().map(|contact| async move {
            let called = self
                .call_logs
                .exists_for_contact_between(&contact.name, start, end)
                .await?;
            Ok::<_, crate::error::CrmError>(called.then(|| contact.name.clone()))
        });
        let called_today: HashSet<String> =
            try_join_all(checks).await?.into_iter().flatten().collect();

        let due = select_due_reminders(today, &candidates, &called_today);
        tracing::debug!(
            candidates = candidates.len(),
            called = called_today.len(),
            due = due.len(),
            "Scheduled calls computed"
        );
        Ok(due)
    }

    async fn mark_call_status(
        &self,
        contact: &str,
        status: &str,
        now: NaiveDateTime,
    ) -> ApiResponse<()> {
        match self.log_call(contact, status, now).await {
            Ok(status) => ApiResponse::success(
                format!("Call marked as {} for {}", status, contact),
                None,
            ),
            Err(e) => {
                tracing::error!("Error marking call status: {}", e);
                ApiResponse::error(format!("Failed to mark call: {}", e))
            }
        }
    }
}
