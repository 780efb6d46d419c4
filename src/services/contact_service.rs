//! Contact service layer.
//!
//! Lookup, search and primary-flag maintenance for contacts, plus the save
//! pipeline every contact write goes through:
//!
//! 1. normalize the primary email and phone flags,
//! 2. derive the milestone dates against the stored record,
//! 3. insert or update the contact,
//! 4. copy email and mobile to deals that have it as primary contact.

use crate::client::PermissionType;
use crate::domain::{DocName, EmailAddress, PhoneNumber};
use crate::error::{CrmError, CrmResult};
use crate::models::{Contact, Deal, PhoneFlag, CONTACT_DOCTYPE};
use crate::repositories::{ContactRepository, DealRepository, PermissionChecker};
use crate::scheduling::{self, MilestoneDates, Milestones};
use crate::services::CalendarService;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::str::FromStr;
use std::sync::Arc;

/// Most rows `search_emails` returns.
pub const EMAIL_SEARCH_LIMIT: usize = 20;

/// Contact field addressed by `create_new` and `set_as_primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Email,
    MobileNo,
    Phone,
}

impl FromStr for ContactField {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(ContactField::Email),
            "mobile_no" => Ok(ContactField::MobileNo),
            "phone" => Ok(ContactField::Phone),
            _ => Err(CrmError::InvalidRequest("Invalid field".to_string())),
        }
    }
}

/// One search hit as `[full_name, email_id, name]`.
pub type EmailSearchRow = [Option<String>; 3];

#[async_trait]
pub trait ContactService: Send + Sync {
    /// A contact with its email and phone rows.
    async fn get_contact(&self, name: &str) -> CrmResult<Contact>;

    /// Deals linked to the contact. Needs read permission on it.
    async fn get_linked_deals(&self, contact: &str) -> CrmResult<Vec<Deal>>;

    /// Append an email or phone number. Needs write permission.
    async fn create_new(
        &self,
        contact: &str,
        field: &str,
        value: &str,
        today: NaiveDate,
    ) -> CrmResult<bool>;

    /// Make `value` the only primary entry for `field`. Needs write permission.
    async fn set_as_primary(
        &self,
        contact: &str,
        field: &str,
        value: &str,
        today: NaiveDate,
    ) -> CrmResult<bool>;

    /// Contacts with an email matching `txt`.
    async fn search_emails(&self, txt: &str) -> CrmResult<Vec<EmailSearchRow>>;

    /// Run the save pipeline for a new or edited contact.
    async fn save_contact(&self, contact: Contact, today: NaiveDate) -> CrmResult<Contact>;

    /// Milestones a save would produce, without writing anything.
    ///
    /// With a contact name, `overrides` replace that contact's stored dates;
    /// without one the dates are treated as a new contact's.
    async fn preview_milestones(
        &self,
        contact: Option<&str>,
        overrides: MilestoneDates,
        today: NaiveDate,
    ) -> CrmResult<Milestones>;

    /// Re-save a stored contact so missing milestones get filled in.
    async fn recompute_milestones(&self, contact: &str, today: NaiveDate) -> CrmResult<Contact>;

    /// Overwrite some of a stored contact's milestone dates and save it.
    ///
    /// Dates left out keep their stored value. A changed creation date
    /// recomputes the follow-ups that depend on it. Needs write permission.
    async fn update_milestone_dates(
        &self,
        contact: &str,
        edits: MilestoneDates,
        today: NaiveDate,
    ) -> CrmResult<Contact>;
}

pub struct ContactServiceImpl {
    contacts: Arc<dyn ContactRepository>,
    deals: Arc<dyn DealRepository>,
    permissions: Arc<dyn PermissionChecker>,
    calendar: Arc<dyn CalendarService>,
}

impl ContactServiceImpl {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        deals: Arc<dyn DealRepository>,
        permissions: Arc<dyn PermissionChecker>,
        calendar: Arc<dyn CalendarService>,
    ) -> Self {
        Self {
            contacts,
            deals,
            permissions,
            calendar,
        }
    }

    async fn ensure_permission(&self, contact: &str, perm: PermissionType) -> CrmResult<()> {
        if self
            .permissions
            .has_permission(CONTACT_DOCTYPE, contact, perm)
            .await?
        {
            Ok(())
        } else {
            tracing::warn!(contact, perm = perm.as_str(), "Permission denied");
            Err(CrmError::PermissionDenied("Not permitted".to_string()))
        }
    }

    /// The stored milestone dates, `None` when the contact is new.
    async fn stored_dates(&self, name: &str) -> CrmResult<Option<MilestoneDates>> {
        if name.is_empty() {
            return Ok(None);
        }
        match self.contacts.get(name).await {
            Ok(stored) => Ok(Some(stored.milestone_dates())),
            Err(CrmError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Steps 1 to 4 of the save pipeline, given what is stored.
    async fn persist(
        &self,
        mut contact: Contact,
        stored: Option<MilestoneDates>,
        today: NaiveDate,
    ) -> CrmResult<Contact> {
        contact.normalize_primaries()?;

        let calendar = self.calendar.calendar().await?;
        let milestones = scheduling::compute_milestones(
            calendar.as_ref(),
            today,
            contact.milestone_dates(),
            stored,
        );
        contact.apply_milestones(milestones);

        let saved = match stored {
            Some(_) => self.contacts.update(&contact).await?,
            None => self.contacts.insert(&contact).await?,
        };
        tracing::info!(
            contact = %saved.name,
            creation = %milestones.creation,
            first = %milestones.first_follow_up,
            second = %milestones.second_follow_up,
            "Contact saved"
        );

        self.sync_primary_deals(&saved).await?;
        Ok(saved)
    }

    async fn sync_primary_deals(&self, contact: &Contact) -> CrmResult<()> {
        let deals = self.deals.with_primary_contact(&contact.name).await?;
        let email = contact.email_id.as_deref();
        let mobile_no = contact.mobile_no.as_deref();
        for mut deal in deals {
            if deal.sync_contact_details(email, mobile_no) {
                tracing::debug!(deal = %deal.name, contact = %contact.name, "Syncing deal contact details");
                self.deals
                    .update_contact_details(&deal.name, email, mobile_no)
                    .await?;
            }
        }
        Ok(())
    }

    /// Load a contact for editing, checking write permission first.
    async fn load_for_write(&self, contact: &str) -> CrmResult<Contact> {
        let name = DocName::new(contact)?;
        self.ensure_permission(name.as_str(), PermissionType::Write)
            .await?;
        self.contacts.get(name.as_str()).await
    }
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn get_contact(&self, name: &str) -> CrmResult<Contact> {
        let name = DocName::new(name)?;
        self.contacts.get(name.as_str()).await
    }

    async fn get_linked_deals(&self, contact: &str) -> CrmResult<Vec<Deal>> {
        let name = DocName::new(contact)?;
        self.ensure_permission(name.as_str(), PermissionType::Read)
            .await?;
        self.deals.linked_to_contact(name.as_str()).await
    }

    async fn create_new(
        &self,
        contact: &str,
        field: &str,
        value: &str,
        today: NaiveDate,
    ) -> CrmResult<bool> {
        let mut doc = self.load_for_write(contact).await?;
        let field: ContactField = field.parse()?;
        let stored = Some(doc.milestone_dates());

        match field {
            ContactField::Email => doc.add_email(EmailAddress::new(value)?),
            ContactField::MobileNo | ContactField::Phone => doc.add_phone(PhoneNumber::new(value)?),
        }

        self.persist(doc, stored, today).await?;
        Ok(true)
    }

    async fn set_as_primary(
        &self,
        contact: &str,
        field: &str,
        value: &str,
        today: NaiveDate,
    ) -> CrmResult<bool> {
        let mut doc = self.load_for_write(contact).await?;
        let field: ContactField = field.parse()?;
        let stored = Some(doc.milestone_dates());

        let found = match field {
            ContactField::Email => doc.set_primary_email(value),
            ContactField::MobileNo => doc.set_primary_phone(value, PhoneFlag::MobileNo),
            ContactField::Phone => doc.set_primary_phone(value, PhoneFlag::Phone),
        };
        if !found {
            tracing::warn!(contact = %doc.name, value, "No entry matches; primary flag cleared");
        }

        self.persist(doc, stored, today).await?;
        Ok(true)
    }

    async fn search_emails(&self, txt: &str) -> CrmResult<Vec<EmailSearchRow>> {
        let hits = self
            .contacts
            .search_with_email(txt.trim(), EMAIL_SEARCH_LIMIT)
            .await?;
        Ok(hits.into_iter().map(|hit| hit.into_row()).collect())
    }

    async fn save_contact(&self, contact: Contact, today: NaiveDate) -> CrmResult<Contact> {
        let stored = self.stored_dates(&contact.name).await?;
        self.persist(contact, stored, today).await
    }

    async fn preview_milestones(
        &self,
        contact: Option<&str>,
        overrides: MilestoneDates,
        today: NaiveDate,
    ) -> CrmResult<Milestones> {
        let stored = match contact {
            Some(name) => Some(self.get_contact(name).await?.milestone_dates()),
            None => None,
        };
        let current = match stored {
            Some(stored) => MilestoneDates {
                creation: overrides.creation.or(stored.creation),
                first_follow_up: overrides.first_follow_up.or(stored.first_follow_up),
                second_follow_up: overrides.second_follow_up.or(stored.second_follow_up),
            },
            None => overrides,
        };

        let calendar = self.calendar.calendar().await?;
        Ok(scheduling::compute_milestones(
            calendar.as_ref(),
            today,
            current,
            stored,
        ))
    }

    async fn recompute_milestones(&self, contact: &str, today: NaiveDate) -> CrmResult<Contact> {
        let doc = self.load_for_write(contact).await?;
        let stored = Some(doc.milestone_dates());
        self.persist(doc, stored, today).await
    }

    async fn update_milestone_dates(
        &self,
        contact: &str,
        edits: MilestoneDates,
        today: NaiveDate,
    ) -> CrmResult<Contact> {
        let mut doc = self.load_for_write(contact).await?;
        let stored = Some(doc.milestone_dates());

        if let Some(date) = edits.creation {
            doc.creation_date = Some(date);
        }
        if let Some(date) = edits.first_follow_up {
            doc.first_follow_up_date = Some(date);
        }
        if let Some(date) = edits.second_follow_up {
            doc.second_follow_up_date = Some(date);
        }
        tracing::info!(contact = %doc.name, ?edits, "Editing milestone dates");

        self.persist(doc, stored, today).await
    }
}
