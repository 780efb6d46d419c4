use async_trait::async_trait;
use std::sync::Arc;

use super::decode;
use crate::client::{AsyncFrappeClient, ListQuery};
use crate::error::CrmResult;
use crate::models::{HolidayList, HOLIDAY_LIST_DOCTYPE};
use crate::repositories::traits::HolidayRepository;

/// Holiday lists read from the site's REST API.
///
/// The list endpoint does not return child rows, so each list is fetched
/// again by name to get its holidays.
pub struct FrappeHolidayRepository {
    client: Arc<dyn AsyncFrappeClient>,
}

impl FrappeHolidayRepository {
    pub fn new(client: Arc<dyn AsyncFrappeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HolidayRepository for FrappeHolidayRepository {
    async fn list_holiday_lists(&self) -> CrmResult<Vec<HolidayList>> {
        let query = ListQuery::new()
            .fields(&["name"])
            .order_by("modified desc");
        let rows = self.client.get_list(HOLIDAY_LIST_DOCTYPE, &query).await?;

        let mut lists = Vec::with_capacity(rows.len());
        for row in rows {
            let header: HolidayList = decode(row)?;
            let full = self
                .client
                .get_doc(HOLIDAY_LIST_DOCTYPE, &header.name)
                .await?;
            lists.push(decode(full)?);
        }
        tracing::debug!("Loaded {} holiday lists", lists.len());
        Ok(lists)
    }
}
