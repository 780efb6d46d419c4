mod frappe_call_log_repository;
mod frappe_contact_repository;
mod frappe_deal_repository;
mod frappe_holiday_repository;
mod frappe_lead_repository;
mod frappe_permission_checker;
mod traits;

pub use frappe_call_log_repository::FrappeCallLogRepository;
pub use frappe_contact_repository::FrappeContactRepository;
pub use frappe_deal_repository::FrappeDealRepository;
pub use frappe_holiday_repository::FrappeHolidayRepository;
pub use frappe_lead_repository::FrappeLeadRepository;
pub use frappe_permission_checker::FrappePermissionChecker;
pub use traits::{
    CallLogRepository, ContactRepository, DealRepository, HolidayRepository, LeadRepository,
    PermissionChecker,
};

use crate::error::CrmResult;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Give a document from the site its model type.
fn decode<T: DeserializeOwned>(doc: Value) -> CrmResult<T> {
    Ok(serde_json::from_value(doc)?)
}
