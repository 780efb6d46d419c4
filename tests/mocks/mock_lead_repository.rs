use async_trait::async_trait;
use crm_followup_server::error::CrmResult;
use crm_followup_server::models::{Lead, LeadSource};
use crm_followup_server::repositories::LeadRepository;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock lead repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockLeadRepository {
    leads: Arc<Mutex<Vec<Lead>>>,
    sources: Arc<Mutex<HashSet<String>>>,
    sources_created: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl MockLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&self, source: &str) {
        self.sources.lock().unwrap().insert(source.to_string());
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.leads.lock().unwrap().clone()
    }

    pub fn has_source(&self, source: &str) -> bool {
        self.sources.lock().unwrap().contains(source)
    }

    pub fn sources_created(&self) -> usize {
        *self.sources_created.lock().unwrap()
    }
}

#[async_trait]
impl LeadRepository for MockLeadRepository {
    async fn insert(&self, lead: &Lead) -> CrmResult<Lead> {
        let mut leads = self.leads.lock().unwrap();
        let mut saved = lead.clone();
        saved.name = format!("CRM-LEAD-{:04}", leads.len() + 1);
        leads.push(saved.clone());
        Ok(saved)
    }

    async fn source_exists(&self, source: &str) -> CrmResult<bool> {
        Ok(self.has_source(source))
    }

    async fn create_source(&self, source: &LeadSource) -> CrmResult<LeadSource> {
        *self.sources_created.lock().unwrap() += 1;
        self.add_source(&source.source_name);
        Ok(LeadSource {
            name: source.source_name.clone(),
            source_name: source.source_name.clone(),
        })
    }
}
