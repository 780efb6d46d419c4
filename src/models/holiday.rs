//! Holiday list model.

use super::frappe_serde::opt_date;
use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// Doctype name of holiday lists on the site.
pub const HOLIDAY_LIST_DOCTYPE: &str = "CRM Holiday List";

/// One holiday row (`holidays` child table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Holiday {
    #[serde(with = "opt_date")]
    pub date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A holiday list covering `from_date..=to_date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct HolidayList {
    pub name: String,

    #[serde(with = "opt_date")]
    pub from_date: Option<NaiveDate>,

    #[serde(with = "opt_date")]
    pub to_date: Option<NaiveDate>,

    pub holidays: Vec<Holiday>,
}
