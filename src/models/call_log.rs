//! Call log model.

use super::frappe_serde::{datetime, opt_datetime};
use super::CONTACT_DOCTYPE;
use crate::error::CrmError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Doctype name of call logs on the site.
pub const CALL_LOG_DOCTYPE: &str = "CRM Call Log";

/// Direction of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CallDirection {
    Incoming,
    #[default]
    Outgoing,
}

/// Outcome of a call, as the site names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallStatus {
    Initiated,
    Ringing,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Failed,
    Busy,
    #[serde(rename = "No Answer")]
    NoAnswer,
    Queued,
    Canceled,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Initiated => "Initiated",
            CallStatus::Ringing => "Ringing",
            CallStatus::InProgress => "In Progress",
            CallStatus::Completed => "Completed",
            CallStatus::Failed => "Failed",
            CallStatus::Busy => "Busy",
            CallStatus::NoAnswer => "No Answer",
            CallStatus::Queued => "Queued",
            CallStatus::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallStatus {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match normalized.as_str() {
            "initiated" => Ok(CallStatus::Initiated),
            "ringing" => Ok(CallStatus::Ringing),
            "inprogress" => Ok(CallStatus::InProgress),
            "completed" => Ok(CallStatus::Completed),
            "failed" => Ok(CallStatus::Failed),
            "busy" => Ok(CallStatus::Busy),
            "noanswer" => Ok(CallStatus::NoAnswer),
            "queued" => Ok(CallStatus::Queued),
            "canceled" | "cancelled" => Ok(CallStatus::Canceled),
            _ => Err(CrmError::InvalidRequest(format!(
                "Unknown call status: {}",
                s
            ))),
        }
    }
}

/// One attempted or completed call. Never modified after insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallLog {
    /// Short unique id chosen by the caller
    pub id: String,

    /// Document name, assigned by the site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// User who placed the call
    pub caller: String,

    /// Called party (the contact name)
    pub to: String,

    #[serde(rename = "type")]
    pub direction: CallDirection,

    pub status: CallStatus,

    #[serde(with = "datetime")]
    pub start_time: NaiveDateTime,

    #[serde(with = "datetime")]
    pub end_time: NaiveDateTime,

    pub reference_doctype: String,

    pub reference_docname: String,

    /// Insert timestamp, assigned by the site
    #[serde(
        default,
        deserialize_with = "opt_datetime::deserialize",
        skip_serializing
    )]
    pub creation: Option<NaiveDateTime>,
}

impl CallLog {
    /// A new outgoing call to `contact` that started and ended at `at`.
    pub fn outgoing_to_contact(
        id: impl Into<String>,
        caller: impl Into<String>,
        contact: &str,
        status: CallStatus,
        at: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            caller: caller.into(),
            to: contact.to_string(),
            direction: CallDirection::Outgoing,
            status,
            start_time: at,
            end_time: at,
            reference_doctype: CONTACT_DOCTYPE.to_string(),
            reference_docname: contact.to_string(),
            creation: None,
        }
    }
}
