use async_trait::async_trait;
use crm_followup_server::error::{CrmError, CrmResult};
use crm_followup_server::models::Deal;
use crm_followup_server::repositories::DealRepository;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock deal repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockDealRepository {
    deals: Arc<Mutex<HashMap<String, Deal>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    fail_inserts: Arc<Mutex<Option<String>>>,
}

#[allow(dead_code)]
impl MockDealRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_deal(&self, deal: Deal) {
        self.deals.lock().unwrap().insert(deal.name.clone(), deal);
    }

    pub fn stored(&self, name: &str) -> Option<Deal> {
        self.deals.lock().unwrap().get(name).cloned()
    }

    pub fn all(&self) -> Vec<Deal> {
        let mut deals: Vec<Deal> = self.deals.lock().unwrap().values().cloned().collect();
        deals.sort_by(|a, b| a.name.cmp(&b.name));
        deals
    }

    /// Make every insert fail with an API error carrying `message`.
    pub fn fail_inserts_with(&self, message: &str) {
        *self.fail_inserts.lock().unwrap() = Some(message.to_string());
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }
}

#[async_trait]
impl DealRepository for MockDealRepository {
    async fn linked_to_contact(&self, contact: &str) -> CrmResult<Vec<Deal>> {
        self.track_call("linked_to_contact");
        Ok(self
            .all()
            .into_iter()
            .filter(|d| d.contacts.iter().any(|link| link.contact == contact))
            .collect())
    }

    async fn with_primary_contact(&self, contact: &str) -> CrmResult<Vec<Deal>> {
        self.track_call("with_primary_contact");
        Ok(self
            .all()
            .into_iter()
            .filter(|d| d.has_primary_contact(contact))
            .collect())
    }

    async fn insert(&self, deal: &Deal) -> CrmResult<Deal> {
        self.track_call("insert");

        if let Some(message) = self.fail_inserts.lock().unwrap().clone() {
            return Err(CrmError::ApiError {
                status: 417,
                message,
            });
        }

        let mut deals = self.deals.lock().unwrap();
        let mut saved = deal.clone();
        saved.name = format!("CRM-DEAL-{:04}", deals.len() + 1);
        deals.insert(saved.name.clone(), saved.clone());
        Ok(saved)
    }

    async fn update_contact_details(
        &self,
        name: &str,
        email: Option<&str>,
        mobile_no: Option<&str>,
    ) -> CrmResult<()> {
        self.track_call("update_contact_details");
        let mut deals = self.deals.lock().unwrap();
        let deal = deals
            .get_mut(name)
            .ok_or_else(|| CrmError::NotFound(format!("CRM Deal {} not found", name)))?;
        deal.email = email.map(str::to_string);
        deal.mobile_no = mobile_no.map(str::to_string);
        Ok(())
    }
}
