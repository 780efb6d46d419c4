use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use super::decode;
use crate::client::{AsyncFrappeClient, Filter, ListQuery};
use crate::error::{CrmError, CrmResult};
use crate::models::frappe_serde::DATE_FORMAT;
use crate::models::{Contact, EmailSearchHit, CONTACT_DOCTYPE};
use crate::repositories::traits::ContactRepository;

const DUE_CONTACT_FIELDS: &[&str] = &[
    "name",
    "first_name",
    "last_name",
    "full_name",
    "email_id",
    "mobile_no",
    "phone",
    "custom_creation_date",
    "custom_first_date",
    "custom_second_date",
];

/// Contact repository backed by the site's REST API.
pub struct FrappeContactRepository {
    client: Arc<dyn AsyncFrappeClient>,
}

impl FrappeContactRepository {
    pub fn new(client: Arc<dyn AsyncFrappeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContactRepository for FrappeContactRepository {
    async fn get(&self, name: &str) -> CrmResult<Contact> {
        let doc = self
            .client
            .get_doc(CONTACT_DOCTYPE, name)
            .await
            .map_err(|e| match e {
                CrmError::NotFound(_) => CrmError::NotFound("Contact not found".to_string()),
                other => other,
            })?;
        decode(doc)
    }

    async fn find_due_on(&self, date: NaiveDate) -> CrmResult<Vec<Contact>> {
        let day = date.format(DATE_FORMAT).to_string();
        let query = ListQuery::new()
            .or_filter(Filter::eq("custom_creation_date", day.as_str()))
            .or_filter(Filter::eq("custom_first_date", day.as_str()))
            .or_filter(Filter::eq("custom_second_date", day.as_str()))
            .fields(DUE_CONTACT_FIELDS)
            .order_by("modified desc");

        let rows = self.client.get_list(CONTACT_DOCTYPE, &query).await?;
        rows.into_iter().map(decode).collect()
    }

    async fn search_with_email(&self, txt: &str, limit: usize) -> CrmResult<Vec<EmailSearchHit>> {
        let mut query = ListQuery::new()
            .filter(Filter::is_set("email_id"))
            .fields(&["full_name", "email_id", "name"])
            .order_by("email_id asc, full_name asc, name asc")
            .limit(limit);
        if !txt.is_empty() {
            query = query
                .or_filter(Filter::contains("full_name", txt))
                .or_filter(Filter::contains("email_id", txt))
                .or_filter(Filter::contains("name", txt));
        }

        let rows = self.client.get_list(CONTACT_DOCTYPE, &query).await?;
        rows.into_iter().map(decode).collect()
    }

    async fn insert(&self, contact: &Contact) -> CrmResult<Contact> {
        let saved = self
            .client
            .insert(CONTACT_DOCTYPE, &serde_json::to_value(contact)?)
            .await?;
        decode(saved)
    }

    async fn update(&self, contact: &Contact) -> CrmResult<Contact> {
        let body: Value = serde_json::to_value(contact)?;
        let saved = self
            .client
            .update(CONTACT_DOCTYPE, &contact.name, &body)
            .await?;
        decode(saved)
    }
}
