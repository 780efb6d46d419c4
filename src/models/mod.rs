//! Data models for CRM documents.
//!
//! Field names follow the site's REST payloads so documents can be sent and
//! received without a separate wire layer.

pub mod call_log;
pub mod contact;
pub mod deal;
pub mod frappe_serde;
pub mod holiday;
pub mod lead;
pub mod response;

pub use call_log::{CallDirection, CallLog, CallStatus, CALL_LOG_DOCTYPE};
pub use contact::{Contact, ContactEmail, ContactPhone, EmailSearchHit, PhoneFlag, CONTACT_DOCTYPE};
pub use deal::{Deal, DealContact, DEAL_CONTACT_DOCTYPE, DEAL_DOCTYPE, DEAL_INITIAL_STATUS};
pub use holiday::{Holiday, HolidayList, HOLIDAY_LIST_DOCTYPE};
pub use lead::{
    DealValue, Lead, LeadSource, WixLeadPayload, LEAD_DOCTYPE, LEAD_INITIAL_STATUS,
    LEAD_SOURCE_DOCTYPE,
};
pub use response::{ApiResponse, ResponseStatus};
