//! Async wrapper around synchronous FrappeClient.
//!
//! This module provides an async interface to the synchronous FrappeClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::{FrappeClient, ListQuery, PermissionType};
use crate::error::{CrmError, CrmResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Async wrapper trait for the site's resource API.
#[async_trait]
pub trait AsyncFrappeClient: Send + Sync {
    async fn get_list(&self, doctype: &str, query: &ListQuery) -> CrmResult<Vec<Value>>;
    async fn get_doc(&self, doctype: &str, name: &str) -> CrmResult<Value>;
    async fn exists(&self, doctype: &str, name: &str) -> CrmResult<bool>;
    async fn insert(&self, doctype: &str, doc: &Value) -> CrmResult<Value>;
    async fn update(&self, doctype: &str, name: &str, doc: &Value) -> CrmResult<Value>;
    async fn has_permission(
        &self,
        doctype: &str,
        name: &str,
        perm: PermissionType,
    ) -> CrmResult<bool>;
}

/// Async wrapper around synchronous FrappeClient.
#[derive(Clone)]
pub struct AsyncFrappeClientImpl {
    client: Arc<FrappeClient>,
}

impl AsyncFrappeClientImpl {
    pub fn new(client: FrappeClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Run `op` against the client on the blocking pool.
    async fn run<T, F>(&self, op: F) -> CrmResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&FrappeClient) -> CrmResult<T> + Send + 'static,
    {
        let client = self.client.clone();
        tokio::task::spawn_blocking(move || op(&client))
            .await
            .map_err(|e| CrmError::HttpError(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl AsyncFrappeClient for AsyncFrappeClientImpl {
    async fn get_list(&self, doctype: &str, query: &ListQuery) -> CrmResult<Vec<Value>> {
        let doctype = doctype.to_string();
        let query = query.clone();
        self.run(move |client| client.get_list(&doctype, &query)).await
    }

    async fn get_doc(&self, doctype: &str, name: &str) -> CrmResult<Value> {
        let doctype = doctype.to_string();
        let name = name.to_string();
        self.run(move |client| client.get_doc(&doctype, &name)).await
    }

    async fn exists(&self, doctype: &str, name: &str) -> CrmResult<bool> {
        let doctype = doctype.to_string();
        let name = name.to_string();
        self.run(move |client| client.exists(&doctype, &name)).await
    }

    async fn insert(&self, doctype: &str, doc: &Value) -> CrmResult<Value> {
        let doctype = doctype.to_string();
        let doc = doc.clone();
        self.run(move |client| client.insert(&doctype, &doc)).await
    }

    async fn update(&self, doctype: &str, name: &str, doc: &Value) -> CrmResult<Value> {
        let doctype = doctype.to_string();
        let name = name.to_string();
        let doc = doc.clone();
        self.run(move |client| client.update(&doctype, &name, &doc))
            .await
    }

    async fn has_permission(
        &self,
        doctype: &str,
        name: &str,
        perm: PermissionType,
    ) -> CrmResult<bool> {
        let doctype = doctype.to_string();
        let name = name.to_string();
        self.run(move |client| client.has_permission(&doctype, &name, perm))
            .await
    }
}
