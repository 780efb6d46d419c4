use crate::client::PermissionType;
use crate::error::CrmResult;
use crate::models::*;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

/// Repository for contacts.
///
/// Provides abstraction over contact storage and retrieval,
/// enabling different implementations (site API, in-memory mock).
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Retrieve a contact with its email and phone rows.
    async fn get(&self, name: &str) -> CrmResult<Contact>;

    /// Contacts with any milestone date equal to `date`.
    async fn find_due_on(&self, date: NaiveDate) -> CrmResult<Vec<Contact>>;

    /// Contacts with an email whose name, email or id contains `txt`,
    /// ordered by email, full name, name.
    async fn search_with_email(&self, txt: &str, limit: usize) -> CrmResult<Vec<EmailSearchHit>>;

    async fn insert(&self, contact: &Contact) -> CrmResult<Contact>;

    async fn update(&self, contact: &Contact) -> CrmResult<Contact>;
}

/// Repository for deals.
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Distinct deals whose contact links include `contact`.
    async fn linked_to_contact(&self, contact: &str) -> CrmResult<Vec<Deal>>;

    /// Deals linking `contact` as their primary contact.
    async fn with_primary_contact(&self, contact: &str) -> CrmResult<Vec<Deal>>;

    async fn insert(&self, deal: &Deal) -> CrmResult<Deal>;

    /// Overwrite only the deal's `email` and `mobile_no`.
    async fn update_contact_details(
        &self,
        name: &str,
        email: Option<&str>,
        mobile_no: Option<&str>,
    ) -> CrmResult<()>;
}

/// Append-only store of call logs.
#[async_trait]
pub trait CallLogRepository: Send + Sync {
    async fn insert(&self, log: &CallLog) -> CrmResult<CallLog>;

    /// Whether a call log referencing `contact` was created in `[start, end]`.
    async fn exists_for_contact_between(
        &self,
        contact: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> CrmResult<bool>;
}

/// Repository for leads and lead sources.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn insert(&self, lead: &Lead) -> CrmResult<Lead>;

    async fn source_exists(&self, source: &str) -> CrmResult<bool>;

    async fn create_source(&self, source: &LeadSource) -> CrmResult<LeadSource>;
}

/// Read-only access to the holiday lists.
#[async_trait]
pub trait HolidayRepository: Send + Sync {
    /// Every holiday list with its holidays, most recently modified first.
    async fn list_holiday_lists(&self) -> CrmResult<Vec<HolidayList>>;
}

/// Permission checks for the session user.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    async fn has_permission(
        &self,
        doctype: &str,
        name: &str,
        perm: PermissionType,
    ) -> CrmResult<bool>;
}
