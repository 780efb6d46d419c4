//! HTTP client for the Frappe CRM site's REST API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client handles token authentication, error
//! mapping and the `{"data": ...}` envelope of the resource endpoints. Documents cross
//! this layer as JSON values; the repositories give them types.

mod async_wrapper;
mod query;

pub use async_wrapper::{AsyncFrappeClient, AsyncFrappeClientImpl};
pub use query::{Filter, ListQuery};

use crate::config::Config;
use crate::error::{CrmError, CrmResult};
use crate::metrics::{HttpTimer, Metrics};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Permission checked through `frappe.client.has_permission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionType {
    Read,
    Write,
}

impl PermissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionType::Read => "read",
            PermissionType::Write => "write",
        }
    }
}

/// HTTP client for a Frappe CRM site.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct FrappeClient {
    base_url: String,
    api_key: String,
    api_secret: String,
    agent: Arc<ureq::Agent>,
    metrics: Metrics,
}

impl FrappeClient {
    /// Create a new FrappeClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.crm_api_url.clone(),
            api_key: config.crm_api_key.clone(),
            api_secret: config.crm_api_secret.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a FrappeClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: String, api_secret: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            api_key,
            api_secret,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn resource_path(doctype: &str, name: Option<&str>) -> String {
        match name {
            Some(name) => format!(
                "/api/resource/{}/{}",
                urlencoding::encode(doctype),
                urlencoding::encode(name)
            ),
            None => format!("/api/resource/{}", urlencoding::encode(doctype)),
        }
    }

    fn auth_header(&self) -> String {
        format!("token {}:{}", self.api_key, self.api_secret)
    }

    /// Send a request and record its timing.
    fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> CrmResult<ureq::Response> {
        let timer = HttpTimer::new(self.metrics.clone());
        let url = self.build_url(path);
        tracing::debug!("{} {}", method, url);

        let request = self
            .agent
            .request(method, &url)
            .set("Authorization", &self.auth_header())
            .set("Accept", "application/json");
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        }
        .map_err(|e| self.map_error(e));

        match &result {
            Ok(_) => timer.complete(),
            Err(e) => {
                tracing::error!("{} {} - Error: {:?}", method, url, e);
                timer.complete_with_error();
            }
        }
        result
    }

    /// Map a ureq error to a CrmError.
    fn map_error(&self, error: ureq::Error) -> CrmError {
        match error {
            ureq::Error::Status(code, response) => {
                let body = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                let message = extract_error_message(&body);

                match code {
                    401 => CrmError::Unauthorized,
                    403 => CrmError::PermissionDenied(message),
                    404 => CrmError::NotFound(message),
                    _ => CrmError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    CrmError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    CrmError::Timeout
                } else {
                    CrmError::HttpError(transport.to_string())
                }
            }
        }
    }

    /// Read the body and unwrap `{"data": ...}`.
    fn read_data(response: ureq::Response) -> CrmResult<Value> {
        let body = response
            .into_string()
            .map_err(|e| CrmError::HttpError(e.to_string()))?;
        let mut value: Value = serde_json::from_str(&body)?;
        value
            .get_mut("data")
            .map(Value::take)
            .ok_or_else(|| CrmError::HttpError("Missing data in API response".to_string()))
    }

    // ========================= Resource Operations =========================

    /// List documents of `doctype` matching `query`.
    pub fn get_list(&self, doctype: &str, query: &ListQuery) -> CrmResult<Vec<Value>> {
        let path = format!(
            "{}?{}",
            Self::resource_path(doctype, None),
            query.to_query_string()
        );
        let response = self.send("GET", &path, None)?;
        let rows = match Self::read_data(response)? {
            Value::Array(rows) => rows,
            other => {
                return Err(CrmError::HttpError(format!(
                    "Expected a list of {} documents, got {}",
                    doctype, other
                )))
            }
        };
        self.metrics.record_documents_read(rows.len());
        Ok(rows)
    }

    /// Fetch one document with its child tables.
    pub fn get_doc(&self, doctype: &str, name: &str) -> CrmResult<Value> {
        let response = self.send("GET", &Self::resource_path(doctype, Some(name)), None)?;
        let doc = Self::read_data(response)?;
        self.metrics.record_documents_read(1);
        Ok(doc)
    }

    /// Whether a document exists. Other failures propagate.
    pub fn exists(&self, doctype: &str, name: &str) -> CrmResult<bool> {
        match self.get_doc(doctype, name) {
            Ok(_) => Ok(true),
            Err(CrmError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Insert a document and return it as stored.
    pub fn insert(&self, doctype: &str, doc: &Value) -> CrmResult<Value> {
        let response = self.send("POST", &Self::resource_path(doctype, None), Some(doc))?;
        let saved = Self::read_data(response)?;
        self.metrics.record_document_written();
        tracing::info!(doctype, name = ?saved.get("name"), "Inserted document");
        Ok(saved)
    }

    /// Save changes to an existing document and return it as stored.
    pub fn update(&self, doctype: &str, name: &str, doc: &Value) -> CrmResult<Value> {
        let response = self.send("PUT", &Self::resource_path(doctype, Some(name)), Some(doc))?;
        let saved = Self::read_data(response)?;
        self.metrics.record_document_written();
        tracing::info!(doctype, name, "Updated document");
        Ok(saved)
    }

    /// Ask the site whether the session user holds `perm` on a document.
    pub fn has_permission(
        &self,
        doctype: &str,
        name: &str,
        perm: PermissionType,
    ) -> CrmResult<bool> {
        let path = format!(
            "/api/method/frappe.client.has_permission?doctype={}&docname={}&perm_type={}",
            urlencoding::encode(doctype),
            urlencoding::encode(name),
            perm.as_str()
        );
        let response = self.send("GET", &path, None)?;
        let body = response
            .into_string()
            .map_err(|e| CrmError::HttpError(e.to_string()))?;
        let value: Value = serde_json::from_str(&body)?;
        Ok(value
            .pointer("/message/has_permission")
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }
}

/// Pull a readable message out of a Frappe error body.
fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    ["exception", "message", "exc_type"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
