//! Application service layer.
//!
//! Services hold the business rules and orchestrate the repositories. They
//! sit between the MCP handlers and the data access layer.

mod calendar_service;
mod contact_service;
mod lead_intake_service;
mod scheduled_call_service;

pub use calendar_service::{CalendarService, CalendarServiceImpl};
pub use contact_service::{
    ContactField, ContactService, ContactServiceImpl, EmailSearchRow, EMAIL_SEARCH_LIMIT,
};
pub use lead_intake_service::{
    LeadIntakeData, LeadIntakeService, LeadIntakeServiceImpl, WIX_LEAD_SOURCE,
};
pub use scheduled_call_service::{ScheduledCallService, ScheduledCallServiceImpl};
