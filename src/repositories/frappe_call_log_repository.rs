use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

use super::decode;
use crate::client::{AsyncFrappeClient, Filter, ListQuery};
use crate::error::CrmResult;
use crate::models::{CallLog, CALL_LOG_DOCTYPE, CONTACT_DOCTYPE};
use crate::repositories::traits::CallLogRepository;

/// Layout the site compares `creation` against in filters.
const FILTER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Call log repository backed by the site's REST API.
pub struct FrappeCallLogRepository {
    client: Arc<dyn AsyncFrappeClient>,
}

impl FrappeCallLogRepository {
    pub fn new(client: Arc<dyn AsyncFrappeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CallLogRepository for FrappeCallLogRepository {
    async fn insert(&self, log: &CallLog) -> CrmResult<CallLog> {
        let saved = self
            .client
            .insert(CALL_LOG_DOCTYPE, &serde_json::to_value(log)?)
            .await?;
        decode(saved)
    }

    async fn exists_for_contact_between(
        &self,
        contact: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> CrmResult<bool> {
        let query = ListQuery::new()
            .filter(Filter::eq("reference_doctype", CONTACT_DOCTYPE))
            .filter(Filter::eq("reference_docname", contact))
            .filter(Filter::between(
                "creation",
                start.format(FILTER_DATETIME_FORMAT).to_string(),
                end.format(FILTER_DATETIME_FORMAT).to_string(),
            ))
            .fields(&["name"])
            .limit(1);

        let rows = self.client.get_list(CALL_LOG_DOCTYPE, &query).await?;
        Ok(!rows.is_empty())
    }
}
