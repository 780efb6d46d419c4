use async_trait::async_trait;
use std::sync::Arc;

use crate::client::{AsyncFrappeClient, PermissionType};
use crate::error::CrmResult;
use crate::repositories::traits::PermissionChecker;

/// Permission checks delegated to the site.
pub struct FrappePermissionChecker {
    client: Arc<dyn AsyncFrappeClient>,
}

impl FrappePermissionChecker {
    pub fn new(client: Arc<dyn AsyncFrappeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PermissionChecker for FrappePermissionChecker {
    async fn has_permission(
        &self,
        doctype: &str,
        name: &str,
        perm: PermissionType,
    ) -> CrmResult<bool> {
        self.client.has_permission(doctype, name, perm).await
    }
}
