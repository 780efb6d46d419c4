use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

use super::decode;
use crate::client::{AsyncFrappeClient, Filter, ListQuery};
use crate::error::CrmResult;
use crate::models::{Deal, DEAL_CONTACT_DOCTYPE, DEAL_DOCTYPE};
use crate::repositories::traits::DealRepository;

const LINKED_DEAL_FIELDS: &[&str] = &[
    "name",
    "organization",
    "currency",
    "annual_revenue",
    "status",
    "email",
    "mobile_no",
    "deal_owner",
    "modified",
];

/// Deal repository backed by the site's REST API.
pub struct FrappeDealRepository {
    client: Arc<dyn AsyncFrappeClient>,
}

impl FrappeDealRepository {
    pub fn new(client: Arc<dyn AsyncFrappeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DealRepository for FrappeDealRepository {
    async fn linked_to_contact(&self, contact: &str) -> CrmResult<Vec<Deal>> {
        let query = ListQuery::new()
            .filter(Filter::eq("contact", contact).on_child(DEAL_CONTACT_DOCTYPE))
            .fields(LINKED_DEAL_FIELDS)
            .order_by("modified desc");

        let rows = self.client.get_list(DEAL_DOCTYPE, &query).await?;

        // The child-table join yields one row per matching link
        let mut seen = HashSet::new();
        let mut deals = Vec::with_capacity(rows.len());
        for row in rows {
            let deal: Deal = decode(row)?;
            if seen.insert(deal.name.clone()) {
                deals.push(deal);
            }
        }
        Ok(deals)
    }

    async fn with_primary_contact(&self, contact: &str) -> CrmResult<Vec<Deal>> {
        let query = ListQuery::new()
            .filter(Filter::eq("contact", contact).on_child(DEAL_CONTACT_DOCTYPE))
            .filter(Filter::eq("is_primary", 1).on_child(DEAL_CONTACT_DOCTYPE))
            .fields(&["name"]);

        let rows = self.client.get_list(DEAL_DOCTYPE, &query).await?;
        let mut names: Vec<String> = Vec::new();
        for row in rows {
            let deal: Deal = decode(row)?;
            if !names.contains(&deal.name) {
                names.push(deal.name);
            }
        }

        let mut deals = Vec::with_capacity(names.len());
        for name in names {
            let deal: Deal = decode(self.client.get_doc(DEAL_DOCTYPE, &name).await?)?;
            if deal.has_primary_contact(contact) {
                deals.push(deal);
            } else {
                tracing::warn!(deal = %deal.name, contact, "Deal no longer has contact as primary");
            }
        }
        Ok(deals)
    }

    async fn insert(&self, deal: &Deal) -> CrmResult<Deal> {
        let saved = self
            .client
            .insert(DEAL_DOCTYPE, &serde_json::to_value(deal)?)
            .await?;
        decode(saved)
    }

    async fn update_contact_details(
        &self,
        name: &str,
        email: Option<&str>,
        mobile_no: Option<&str>,
    ) -> CrmResult<()> {
        // Partial body: a full document would rewrite the contacts child table
        let patch = json!({ "email": email, "mobile_no": mobile_no });
        self.client.update(DEAL_DOCTYPE, name, &patch).await?;
        Ok(())
    }
}
