use async_trait::async_trait;
use std::sync::Arc;

use super::decode;
use crate::client::AsyncFrappeClient;
use crate::error::CrmResult;
use crate::models::{Lead, LeadSource, LEAD_DOCTYPE, LEAD_SOURCE_DOCTYPE};
use crate::repositories::traits::LeadRepository;

/// Lead repository backed by the site's REST API.
pub struct FrappeLeadRepository {
    client: Arc<dyn AsyncFrappeClient>,
}

impl FrappeLeadRepository {
    pub fn new(client: Arc<dyn AsyncFrappeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LeadRepository for FrappeLeadRepository {
    async fn insert(&self, lead: &Lead) -> CrmResult<Lead> {
        let saved = self
            .client
            .insert(LEAD_DOCTYPE, &serde_json::to_value(lead)?)
            .await?;
        decode(saved)
    }

    async fn source_exists(&self, source: &str) -> CrmResult<bool> {
        self.client.exists(LEAD_SOURCE_DOCTYPE, source).await
    }

    async fn create_source(&self, source: &LeadSource) -> CrmResult<LeadSource> {
        let saved = self
            .client
            .insert(LEAD_SOURCE_DOCTYPE, &serde_json::to_value(source)?)
            .await?;
        decode(saved)
    }
}
