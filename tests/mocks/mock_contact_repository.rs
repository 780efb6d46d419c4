use async_trait::async_trait;
use chrono::NaiveDate;
use crm_followup_server::error::{CrmError, CrmResult};
use crm_followup_server::models::{Contact, EmailSearchHit};
use crm_followup_server::repositories::ContactRepository;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock contact repository for testing.
///
/// Provides an in-memory implementation of ContactRepository that can be
/// easily configured with test data and tracks method calls for verification.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockContactRepository {
    contacts: Arc<Mutex<HashMap<String, Contact>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockContactRepository {
    /// Create a new empty MockContactRepository.
    pub fn new() -> Self {
        Self {
            contacts: Arc::new(Mutex::new(HashMap::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a contact to the mock repository as if it were already stored.
    pub fn add_contact(&self, contact: Contact) {
        let mut contacts = self.contacts.lock().unwrap();
        contacts.insert(contact.name.clone(), contact);
    }

    /// Add multiple contacts to the mock repository.
    pub fn add_contacts(&self, contacts_list: Vec<Contact>) {
        let mut contacts = self.contacts.lock().unwrap();
        for contact in contacts_list {
            contacts.insert(contact.name.clone(), contact);
        }
    }

    /// The stored version of a contact.
    pub fn stored(&self, name: &str) -> Option<Contact> {
        self.contacts.lock().unwrap().get(name).cloned()
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }
}

impl Default for MockContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn get(&self, name: &str) -> CrmResult<Contact> {
        self.track_call("get");

        let contacts = self.contacts.lock().unwrap();
        contacts
            .get(name)
            .cloned()
            .ok_or_else(|| CrmError::NotFound("Contact not found".to_string()))
    }

    async fn find_due_on(&self, date: NaiveDate) -> CrmResult<Vec<Contact>> {
        self.track_call("find_due_on");

        let contacts = self.contacts.lock().unwrap();
        let mut due: Vec<Contact> = contacts
            .values()
            .filter(|c| {
                c.creation_date == Some(date)
                    || c.first_follow_up_date == Some(date)
                    || c.second_follow_up_date == Some(date)
            })
            .cloned()
            .collect();
        due.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(due)
    }

    async fn search_with_email(&self, txt: &str, limit: usize) -> CrmResult<Vec<EmailSearchHit>> {
        self.track_call("search_with_email");

        let needle = txt.to_lowercase();
        let matches = |value: Option<&str>| {
            value
                .map(|v| v.to_lowercase().contains(&needle))
                .unwrap_or(false)
        };

        let contacts = self.contacts.lock().unwrap();
        let mut hits: Vec<EmailSearchHit> = contacts
            .values()
            .filter(|c| c.email_id.as_deref().is_some_and(|e| !e.is_empty()))
            .filter(|c| {
                matches(c.full_name.as_deref())
                    || matches(c.email_id.as_deref())
                    || matches(Some(c.name.as_str()))
            })
            .map(|c| EmailSearchHit {
                full_name: c.full_name.clone(),
                email_id: c.email_id.clone(),
                name: c.name.clone(),
            })
            .collect();
        hits.sort_by(|a, b| {
            (&a.email_id, &a.full_name, &a.name).cmp(&(&b.email_id, &b.full_name, &b.name))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn insert(&self, contact: &Contact) -> CrmResult<Contact> {
        self.track_call("insert");

        let mut contacts = self.contacts.lock().unwrap();
        let mut saved = contact.clone();
        if saved.name.is_empty() {
            saved.name = format!("{}-{}", saved.display_name(), contacts.len() + 1);
        }
        contacts.insert(saved.name.clone(), saved.clone());
        Ok(saved)
    }

    async fn update(&self, contact: &Contact) -> CrmResult<Contact> {
        self.track_call("update");

        let mut contacts = self.contacts.lock().unwrap();
        if !contacts.contains_key(&contact.name) {
            return Err(CrmError::NotFound("Contact not found".to_string()));
        }
        contacts.insert(contact.name.clone(), contact.clone());
        Ok(contact.clone())
    }
}
