//! MCP tool handlers for the CRM follow-up server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::error::CrmError;
use crate::models::WixLeadPayload;
use crate::scheduling::{parse_date, MilestoneDates};
use crate::services::{CalendarService, ContactService, LeadIntakeService, ScheduledCallService};
use chrono::{Local, NaiveDate};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server exposing follow-up scheduling and contact tools.
#[derive(Clone)]
pub struct CrmFollowupServer {
    contact_service: Arc<dyn ContactService>,
    scheduled_call_service: Arc<dyn ScheduledCallService>,
    lead_intake_service: Arc<dyn LeadIntakeService>,
    calendar_service: Arc<dyn CalendarService>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for CrmFollowupServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "crm-followup-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for a Frappe CRM site - schedules business-day follow-up calls, logs call outcomes, maintains contact emails and phones, and takes in web-form leads.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
struct TodayParams {
    /// Date to evaluate as YYYY-MM-DD; defaults to the server's local date
    #[serde(default)]
    today: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct MarkCallStatusParams {
    contact: String,
    /// Initiated, Ringing, In Progress, Completed, Failed, Busy, No Answer, Queued or Canceled
    status: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ContactNameParams {
    name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct LinkedDealsParams {
    contact: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ContactFieldParams {
    contact: String,
    /// email, mobile_no or phone
    field: String,
    value: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchEmailsParams {
    #[serde(default)]
    txt: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct DateParams {
    /// YYYY-MM-DD
    date: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ComputeMilestonesParams {
    /// Stored contact to start from; omit to preview a new contact
    #[serde(default)]
    contact: Option<String>,
    #[serde(default)]
    creation_date: Option<String>,
    #[serde(default)]
    first_follow_up_date: Option<String>,
    #[serde(default)]
    second_follow_up_date: Option<String>,
    #[serde(default)]
    today: Option<String>,
}

/// Milestone date edits for a stored contact; omitted dates keep their value.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateContactDatesParams {
    pub contact: String,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub first_follow_up_date: Option<String>,
    #[serde(default)]
    pub second_follow_up_date: Option<String>,
    #[serde(default)]
    pub today: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RecomputeMilestonesParams {
    contact: String,
    #[serde(default)]
    today: Option<String>,
}

// Map service errors onto MCP error codes
fn to_mcp_error(e: impl Into<CrmError>) -> McpError {
    let e = e.into();
    let code = match &e {
        CrmError::NotFound(_) | CrmError::InvalidRequest(_) | CrmError::InvalidDateInput(_) => {
            ErrorCode::INVALID_PARAMS
        }
        CrmError::PermissionDenied(_) | CrmError::Unauthorized => ErrorCode::INVALID_REQUEST,
        _ => ErrorCode::INTERNAL_ERROR,
    };
    McpError {
        code,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn json_result(value: &impl Serialize) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn resolve_today(today: Option<&str>) -> Result<NaiveDate, McpError> {
    match today {
        Some(date) => parse_date(date).map_err(to_mcp_error),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_optional_date(date: Option<&str>) -> Result<Option<NaiveDate>, McpError> {
    date.filter(|d| !d.trim().is_empty())
        .map(parse_date)
        .transpose()
        .map_err(to_mcp_error)
}

#[tool_router]
impl CrmFollowupServer {
    pub fn new(
        contact_service: Arc<dyn ContactService>,
        scheduled_call_service: Arc<dyn ScheduledCallService>,
        lead_intake_service: Arc<dyn LeadIntakeService>,
        calendar_service: Arc<dyn CalendarService>,
    ) -> Self {
        Self {
            contact_service,
            scheduled_call_service,
            lead_intake_service,
            calendar_service,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "List contacts due for a call today: their creation, first follow-up or second follow-up date is today and no call has been logged for them today."
    )]
    async fn get_scheduled_calls(
        &self,
        params: Parameters<TodayParams>,
    ) -> Result<CallToolResult, McpError> {
        let today = resolve_today(params.0.today.as_deref())?;

        let calls = self
            .scheduled_call_service
            .list_due_reminders(today)
            .await
            .map_err(to_mcp_error)?;

        json_result(&calls)
    }

    #[tool(description = "Log the outcome of an outgoing call to a contact")]
    async fn mark_call_status(
        &self,
        params: Parameters<MarkCallStatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: mark_call_status called for {}", params.contact);

        let now = Local::now().naive_local();
        let response = self
            .scheduled_call_service
            .mark_call_status(&params.contact, &params.status, now)
            .await;

        json_result(&response)
    }

    #[tool(description = "Retrieve a contact with all of its email addresses and phone numbers")]
    async fn get_contact(
        &self,
        params: Parameters<ContactNameParams>,
    ) -> Result<CallToolResult, McpError> {
        let contact = self
            .contact_service
            .get_contact(&params.0.name)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }

    #[tool(description = "List the deals a contact is linked to")]
    async fn get_linked_deals(
        &self,
        params: Parameters<LinkedDealsParams>,
    ) -> Result<CallToolResult, McpError> {
        let deals = self
            .contact_service
            .get_linked_deals(&params.0.contact)
            .await
            .map_err(to_mcp_error)?;

        json_result(&deals)
    }

    #[tool(description = "Add an email address (field 'email') or phone number (field 'mobile_no' or 'phone') to a contact")]
    async fn create_new(
        &self,
        params: Parameters<ContactFieldParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let today = Local::now().date_naive();

        let created = self
            .contact_service
            .create_new(&params.contact, &params.field, &params.value, today)
            .await
            .map_err(to_mcp_error)?;

        json_result(&created)
    }

    #[tool(description = "Make one of a contact's email addresses or phone numbers the primary one")]
    async fn set_as_primary(
        &self,
        params: Parameters<ContactFieldParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let today = Local::now().date_naive();

        let updated = self
            .contact_service
            .set_as_primary(&params.contact, &params.field, &params.value, today)
            .await
            .map_err(to_mcp_error)?;

        json_result(&updated)
    }

    #[tool(
        description = "Search contacts that have an email address by name, email or id. Returns up to 20 rows of [full_name, email_id, name]."
    )]
    async fn search_emails(
        &self,
        params: Parameters<SearchEmailsParams>,
    ) -> Result<CallToolResult, McpError> {
        let rows = self
            .contact_service
            .search_emails(&params.0.txt)
            .await
            .map_err(to_mcp_error)?;

        json_result(&rows)
    }

    #[tool(
        description = "Create a CRM lead from a website form submission, optionally with a deal. Always answers with a status envelope."
    )]
    async fn create_lead_from_wix(
        &self,
        params: Parameters<WixLeadPayload>,
    ) -> Result<CallToolResult, McpError> {
        let response = self.lead_intake_service.create_lead_from_wix(params.0).await;
        json_result(&response)
    }

    #[tool(description = "Whether a date is a business day: not a weekend and not a holiday")]
    async fn is_business_day(
        &self,
        params: Parameters<DateParams>,
    ) -> Result<CallToolResult, McpError> {
        let date = parse_date(&params.0.date).map_err(to_mcp_error)?;

        let business_day = self
            .calendar_service
            .is_business_day(date)
            .await
            .map_err(to_mcp_error)?;

        json_result(&serde_json::json!({
            "date": date,
            "is_business_day": business_day,
        }))
    }

    #[tool(
        description = "Preview the creation, first follow-up and second follow-up dates a contact would get when saved. Nothing is written."
    )]
    async fn compute_milestones(
        &self,
        params: Parameters<ComputeMilestonesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let today = resolve_today(params.today.as_deref())?;
        let overrides = MilestoneDates {
            creation: parse_optional_date(params.creation_date.as_deref())?,
            first_follow_up: parse_optional_date(params.first_follow_up_date.as_deref())?,
            second_follow_up: parse_optional_date(params.second_follow_up_date.as_deref())?,
        };

        let milestones = self
            .contact_service
            .preview_milestones(params.contact.as_deref(), overrides, today)
            .await
            .map_err(to_mcp_error)?;

        json_result(&milestones)
    }

    #[tool(description = "Save a contact again so any missing follow-up dates are filled in")]
    async fn recompute_contact_milestones(
        &self,
        params: Parameters<RecomputeMilestonesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let today = resolve_today(params.today.as_deref())?;

        let contact = self
            .contact_service
            .recompute_milestones(&params.contact, today)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }

    #[tool(
        description = "Change a contact's creation, first follow-up or second follow-up date and save it. A new creation date moves both follow-ups; a new first follow-up moves the second."
    )]
    pub async fn update_contact_dates(
        &self,
        params: Parameters<UpdateContactDatesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: update_contact_dates called for {}", params.contact);
        let today = resolve_today(params.today.as_deref())?;
        let edits = MilestoneDates {
            creation: parse_optional_date(params.creation_date.as_deref())?,
            first_follow_up: parse_optional_date(params.first_follow_up_date.as_deref())?,
            second_follow_up: parse_optional_date(params.second_follow_up_date.as_deref())?,
        };

        let contact = self
            .contact_service
            .update_milestone_dates(&params.contact, edits, today)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }
}
