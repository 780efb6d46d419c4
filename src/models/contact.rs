//! Contact model representing a person on the CRM site.

use super::frappe_serde::{int_bool, opt_date};
use crate::domain::{EmailAddress, PhoneNumber};
use crate::error::{CrmError, CrmResult};
use crate::scheduling::{MilestoneDates, Milestones};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Doctype name of contacts on the site.
pub const CONTACT_DOCTYPE: &str = "Contact";

/// An email row in the contact's `email_ids` child table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ContactEmail {
    /// Row name, assigned by the site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub email_id: String,

    #[serde(with = "int_bool")]
    pub is_primary: bool,
}

/// A phone row in the contact's `phone_nos` child table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ContactPhone {
    /// Row name, assigned by the site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub phone: String,

    #[serde(with = "int_bool")]
    pub is_primary_mobile_no: bool,

    #[serde(with = "int_bool")]
    pub is_primary_phone: bool,
}

/// Which primary flag of a phone row is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneFlag {
    /// `is_primary_mobile_no`, mirrored into `mobile_no`
    MobileNo,
    /// `is_primary_phone`, mirrored into `phone`
    Phone,
}

/// A contact on the CRM site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Contact {
    /// Document name (primary key)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Primary email, mirrored from `email_ids`
    pub email_id: Option<String>,

    /// Primary mobile number, mirrored from `phone_nos`
    pub mobile_no: Option<String>,

    /// Primary phone number, mirrored from `phone_nos`
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub email_ids: Vec<ContactEmail>,

    pub phone_nos: Vec<ContactPhone>,

    /// First business day the contact should be called
    #[serde(
        rename = "custom_creation_date",
        with = "opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<NaiveDate>,

    /// Two business days after `creation_date`
    #[serde(
        rename = "custom_first_date",
        with = "opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_follow_up_date: Option<NaiveDate>,

    /// Four business days after `first_follow_up_date`
    #[serde(
        rename = "custom_second_date",
        with = "opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub second_follow_up_date: Option<NaiveDate>,

    /// Last modification timestamp, as sent by the site
    #[serde(skip_serializing)]
    pub modified: Option<String>,
}

impl Contact {
    /// Create a contact with only a name and first name set.
    pub fn new(name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            first_name: Some(first_name.into()),
            ..Default::default()
        }
    }

    /// "First Last", trimmed; empty parts are skipped.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    pub fn milestone_dates(&self) -> MilestoneDates {
        MilestoneDates {
            creation: self.creation_date,
            first_follow_up: self.first_follow_up_date,
            second_follow_up: self.second_follow_up_date,
        }
    }

    pub fn apply_milestones(&mut self, milestones: Milestones) {
        self.creation_date = Some(milestones.creation);
        self.first_follow_up_date = Some(milestones.first_follow_up);
        self.second_follow_up_date = Some(milestones.second_follow_up);
    }

    pub fn add_email(&mut self, email: EmailAddress) {
        self.email_ids.push(ContactEmail {
            name: None,
            email_id: email.into_inner(),
            is_primary: false,
        });
    }

    pub fn add_phone(&mut self, phone: PhoneNumber) {
        self.phone_nos.push(ContactPhone {
            name: None,
            phone: phone.into_inner(),
            is_primary_mobile_no: false,
            is_primary_phone: false,
        });
    }

    /// Make `value` the only primary email. Returns whether it was found.
    pub fn set_primary_email(&mut self, value: &str) -> bool {
        let mut found = false;
        for email in &mut self.email_ids {
            email.is_primary = email.email_id == value;
            found |= email.is_primary;
        }
        found
    }

    /// Make `value` the only phone carrying `flag`. Returns whether it was found.
    pub fn set_primary_phone(&mut self, value: &str, flag: PhoneFlag) -> bool {
        let mut found = false;
        for row in &mut self.phone_nos {
            let hit = row.phone == value;
            match flag {
                PhoneFlag::MobileNo => row.is_primary_mobile_no = hit,
                PhoneFlag::Phone => row.is_primary_phone = hit,
            }
            found |= hit;
        }
        found
    }

    /// Enforce the primary-flag invariants and refresh the mirrored fields.
    ///
    /// A lone email becomes primary, a lone phone becomes the primary mobile.
    /// More than one primary email, primary mobile or primary phone is
    /// rejected.
    pub fn normalize_primaries(&mut self) -> CrmResult<()> {
        if let [only] = self.email_ids.as_mut_slice() {
            only.is_primary = true;
        }
        if let [only] = self.phone_nos.as_mut_slice() {
            only.is_primary_mobile_no = true;
        }

        let primary_emails: Vec<&ContactEmail> =
            self.email_ids.iter().filter(|e| e.is_primary).collect();
        if primary_emails.len() > 1 {
            return Err(CrmError::InvalidRequest(
                "Only one email can be set as primary".to_string(),
            ));
        }
        let email_id = primary_emails.first().map(|e| e.email_id.clone());

        let mobile_no = self.primary_phone(PhoneFlag::MobileNo)?;
        let phone = self.primary_phone(PhoneFlag::Phone)?;

        self.email_id = email_id;
        self.mobile_no = mobile_no;
        self.phone = phone;
        Ok(())
    }

    fn primary_phone(&self, flag: PhoneFlag) -> CrmResult<Option<String>> {
        let mut primaries = self.phone_nos.iter().filter(|row| match flag {
            PhoneFlag::MobileNo => row.is_primary_mobile_no,
            PhoneFlag::Phone => row.is_primary_phone,
        });
        let first = primaries.next();
        if primaries.next().is_some() {
            let what = match flag {
                PhoneFlag::MobileNo => "mobile number",
                PhoneFlag::Phone => "phone number",
            };
            return Err(CrmError::InvalidRequest(format!(
                "Only one {} can be set as primary",
                what
            )));
        }
        Ok(first.map(|row| row.phone.clone()))
    }
}

/// One row of the email search: `[full_name, email_id, name]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EmailSearchHit {
    pub full_name: Option<String>,
    pub email_id: Option<String>,
    pub name: String,
}

impl EmailSearchHit {
    /// The positional form returned to callers.
    pub fn into_row(self) -> [Option<String>; 3] {
        [self.full_name, self.email_id, Some(self.name)]
    }
}
