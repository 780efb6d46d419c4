//! Lead, lead source and the web-form payload that creates them.

use crate::error::{CrmError, CrmResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Doctype name of leads on the site.
pub const LEAD_DOCTYPE: &str = "CRM Lead";

/// Doctype name of lead sources on the site.
pub const LEAD_SOURCE_DOCTYPE: &str = "CRM Lead Source";

/// Status given to every lead created from the web form.
pub const LEAD_INITIAL_STATUS: &str = "New";

/// A lead on the CRM site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Lead {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_no: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub source: Option<String>,

    pub status: Option<String>,
}

/// A named lead source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LeadSource {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    pub source_name: String,
}

/// Deal value as posted by the form builder: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DealValue {
    Number(f64),
    Text(String),
}

impl DealValue {
    pub fn to_f64(&self) -> CrmResult<f64> {
        match self {
            DealValue::Number(n) => Ok(*n),
            DealValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                CrmError::InvalidRequest(format!("could not convert string to float: '{}'", s))
            }),
        }
    }
}

/// Body of a lead-form submission.
#[derive(Debug, Clone, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct WixLeadPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub organization: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub create_deal: bool,
    pub deal_value: Option<DealValue>,
}

impl WixLeadPayload {
    /// Build the lead document for this submission.
    pub fn to_lead(&self, source: &str) -> Lead {
        Lead {
            name: String::new(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            mobile_no: self.mobile_no.clone(),
            organization: self.organization.clone(),
            website: self.website.clone(),
            notes: self.notes.clone(),
            source: Some(source.to_string()),
            status: Some(LEAD_INITIAL_STATUS.to_string()),
        }
    }
}
