//! Selection of contacts that need a call today.

use super::milestones::MilestoneDates;
use crate::models::Contact;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Date layout of the reminder rows shown to agents.
const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Which milestone made a contact due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FollowUpStage {
    Creation,
    FirstFollowUp,
    SecondFollowUp,
}

impl FollowUpStage {
    pub fn label(&self) -> &'static str {
        match self {
            FollowUpStage::Creation => "creation",
            FollowUpStage::FirstFollowUp => "first follow-up",
            FollowUpStage::SecondFollowUp => "second follow-up",
        }
    }

    /// The stage whose date is `today`, earliest milestone first.
    pub fn due_on(dates: &MilestoneDates, today: NaiveDate) -> Option<Self> {
        if dates.creation == Some(today) {
            Some(FollowUpStage::Creation)
        } else if dates.first_follow_up == Some(today) {
            Some(FollowUpStage::FirstFollowUp)
        } else if dates.second_follow_up == Some(today) {
            Some(FollowUpStage::SecondFollowUp)
        } else {
            None
        }
    }
}

impl fmt::Display for FollowUpStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the scheduled-calls list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledCall {
    pub contact_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status_label: String,
    #[serde(skip)]
    pub stage: FollowUpStage,
    pub creation_date: Option<String>,
    pub first_date: Option<String>,
    pub second_date: Option<String>,
}

impl ScheduledCall {
    pub fn new(contact: &Contact, stage: FollowUpStage) -> Self {
        let fmt_date = |d: Option<NaiveDate>| d.map(|d| d.format(DISPLAY_DATE_FORMAT).to_string());
        Self {
            contact_id: contact.name.clone(),
            full_name: contact.display_name(),
            email: contact.email_id.clone(),
            phone: contact.mobile_no.clone(),
            status_label: stage.label().to_string(),
            stage,
            creation_date: fmt_date(contact.creation_date),
            first_date: fmt_date(contact.first_follow_up_date),
            second_date: fmt_date(contact.second_follow_up_date),
        }
    }
}

/// Inclusive bounds of `day`: 00:00:00 to 23:59:59.
pub fn day_window(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(NaiveTime::MIN);
    let end = day.and_hms_opt(23, 59, 59).unwrap_or(start);
    (start, end)
}

/// Reminders for `today`, in the order the contacts were given.
///
/// Contacts named in `called_today` already have a call logged today and are
/// left out, as are contacts with no milestone on `today`.
pub fn select_due_reminders<'a, I>(
    today: NaiveDate,
    contacts: I,
    called_today: &HashSet<String>,
) -> Vec<ScheduledCall>
where
    I: IntoIterator<Item = &'a Contact>,
{
    contacts
        .into_iter()
        .filter(|contact| !called_today.contains(&contact.name))
        .filter_map(|contact| {
            FollowUpStage::due_on(&contact.milestone_dates(), today)
                .map(|stage| ScheduledCall::new(contact, stage))
        })
        .collect()
}
