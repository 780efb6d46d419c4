//! CRM Follow-up Server - An MCP server for a Frappe CRM site.
//!
//! This library schedules business-day follow-up calls for contacts, logs call
//! outcomes, maintains a contact's email addresses and phone numbers, and turns
//! website form submissions into leads and deals.
//!
//! # Architecture
//!
//! - **models**: Documents exchanged with the site (contacts, deals, call logs, leads, holidays)
//! - **domain**: Validated value objects for names, emails and phone numbers
//! - **scheduling**: Pure business-day arithmetic, milestone computation and reminder selection
//! - **client**: HTTP client for the site's REST API
//! - **repositories**: Typed data access over the client
//! - **services**: Business rules orchestrating the repositories
//! - **events**: Realtime notifications on an in-process bus
//! - **cache**: TTL cache for the holiday calendar
//! - **server**: MCP protocol server and tool handlers

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod scheduling;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use cache::TimedCache;
pub use client::FrappeClient;
pub use config::Config;
pub use error::{ConfigError, CrmError, CrmResult};
pub use events::{event_bus, BroadcastPublisher, EventPublisher, RealtimeEvent};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{ApiResponse, CallLog, CallStatus, Contact, Deal, Lead, WixLeadPayload};
pub use scheduling::{HolidayCalendar, HolidayTable, MilestoneDates, Milestones, ScheduledCall};
pub use server::CrmFollowupServer;
