use async_trait::async_trait;
use crm_followup_server::client::PermissionType;
use crm_followup_server::error::CrmResult;
use crm_followup_server::repositories::PermissionChecker;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Permission checker granting everything except explicitly denied documents.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockPermissionChecker {
    denied: Arc<Mutex<HashSet<String>>>,
}

#[allow(dead_code)]
impl MockPermissionChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deny(&self, name: &str) {
        self.denied.lock().unwrap().insert(name.to_string());
    }
}

#[async_trait]
impl PermissionChecker for MockPermissionChecker {
    async fn has_permission(
        &self,
        _doctype: &str,
        name: &str,
        _perm: PermissionType,
    ) -> CrmResult<bool> {
        Ok(!self.denied.lock().unwrap().contains(name))
    }
}
