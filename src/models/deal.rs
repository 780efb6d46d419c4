//! Deal model and its contact links.

use super::frappe_serde::int_bool;
use serde::{Deserialize, Serialize};

/// Doctype name of deals on the site.
pub const DEAL_DOCTYPE: &str = "CRM Deal";

/// Child doctype linking deals to contacts.
pub const DEAL_CONTACT_DOCTYPE: &str = "CRM Contacts";

/// Status given to deals opened from a web lead.
pub const DEAL_INITIAL_STATUS: &str = "Qualification";

/// A contact linked to a deal (`contacts` child table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DealContact {
    pub contact: String,

    #[serde(with = "int_bool")]
    pub is_primary: bool,
}

/// A deal on the CRM site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Deal {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Copy of the primary contact's email
    pub email: Option<String>,

    /// Copy of the primary contact's mobile number
    pub mobile_no: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_owner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Lead this deal was converted from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<DealContact>,

    /// Last modification timestamp, as sent by the site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl Deal {
    /// Whether `contact` is linked as this deal's primary contact.
    pub fn has_primary_contact(&self, contact: &str) -> bool {
        self.contacts
            .iter()
            .any(|link| link.is_primary && link.contact == contact)
    }

    /// Copy the contact's email and mobile. Returns whether anything changed.
    pub fn sync_contact_details(&mut self, email: Option<&str>, mobile_no: Option<&str>) -> bool {
        if self.email.as_deref() == email && self.mobile_no.as_deref() == mobile_no {
            return false;
        }
        self.email = email.map(str::to_string);
        self.mobile_no = mobile_no.map(str::to_string);
        true
    }
}
