//! Lead intake from the website contact form.

use crate::domain::EmailAddress;
use crate::error::{CrmError, CrmResult};
use crate::models::{
    ApiResponse, Deal, Lead, LeadSource, WixLeadPayload, DEAL_INITIAL_STATUS,
};
use crate::repositories::{DealRepository, LeadRepository};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Lead source recorded on everything created from the form.
pub const WIX_LEAD_SOURCE: &str = "Wix Website";

/// Names of the created documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadIntakeData {
    pub lead_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
}

#[async_trait]
pub trait LeadIntakeService: Send + Sync {
    /// Create a lead, and a deal when asked, from a form submission.
    ///
    /// Never fails: errors come back as an error envelope.
    async fn create_lead_from_wix(&self, payload: WixLeadPayload) -> ApiResponse<LeadIntakeData>;
}

pub struct LeadIntakeServiceImpl {
    leads: Arc<dyn LeadRepository>,
    deals: Arc<dyn DealRepository>,
    session_user: String,
}

impl LeadIntakeServiceImpl {
    pub fn new(
        leads: Arc<dyn LeadRepository>,
        deals: Arc<dyn DealRepository>,
        session_user: impl Into<String>,
    ) -> Self {
        Self {
            leads,
            deals,
            session_user: session_user.into(),
        }
    }

    fn validate(payload: &WixLeadPayload) -> CrmResult<()> {
        let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
        if email.is_empty() {
            return Err(CrmError::InvalidRequest("Email is required".to_string()));
        }
        if !EmailAddress::is_valid(email) {
            return Err(CrmError::InvalidRequest("Invalid email address".to_string()));
        }
        let first_name = payload.first_name.as_deref().map(str::trim).unwrap_or_default();
        if first_name.is_empty() {
            return Err(CrmError::InvalidRequest("First name is required".to_string()));
        }
        Ok(())
    }

    async fn ensure_source(&self) -> CrmResult<()> {
        if !self.leads.source_exists(WIX_LEAD_SOURCE).await? {
            tracing::info!("Creating lead source {}", WIX_LEAD_SOURCE);
            let source = LeadSource {
                name: String::new(),
                source_name: WIX_LEAD_SOURCE.to_string(),
            };
            self.leads.create_source(&source).await?;
        }
        Ok(())
    }

    async fn create_deal(&self, lead: &Lead, payload: &WixLeadPayload) -> CrmResult<Deal> {
        let deal_value = match &payload.deal_value {
            Some(value) => Some(value.to_f64()?).filter(|v| *v != 0.0),
            None => None,
        };
        let deal = Deal {
            organization: lead.organization.clone(),
            email: lead.email.clone(),
            mobile_no: lead.mobile_no.clone(),
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            lead: Some(lead.name.clone()),
            status: Some(DEAL_INITIAL_STATUS.to_string()),
            deal_owner: Some(self.session_user.clone()),
            source: Some(WIX_LEAD_SOURCE.to_string()),
            deal_value,
            ..Default::default()
        };
        self.deals.insert(&deal).await
    }

    async fn intake(&self, payload: &WixLeadPayload) -> CrmResult<LeadIntakeData> {
        Self::validate(payload)?;
        self.ensure_source().await?;

        let lead = self.leads.insert(&payload.to_lead(WIX_LEAD_SOURCE)).await?;
        tracing::info!(lead = %lead.name, "Lead created from web form");

        let deal_id = if payload.create_deal {
            let deal = self.create_deal(&lead, payload).await.map_err(|e| {
                CrmError::Other(format!("Deal Creation Error for Lead {}: {}", lead.name, e))
            })?;
            tracing::info!(lead = %lead.name, deal = %deal.name, "Deal created for lead");
            Some(deal.name)
        } else {
            None
        };

        Ok(LeadIntakeData {
            lead_id: lead.name,
            deal_id,
        })
    }
}

#[async_trait]
impl LeadIntakeService for LeadIntakeServiceImpl {
    async fn create_lead_from_wix(&self, payload: WixLeadPayload) -> ApiResponse<LeadIntakeData> {
        match self.intake(&payload).await {
            Ok(data) => ApiResponse::success("Lead created successfully", Some(data)),
            Err(e) => {
                tracing::error!("Wix lead creation error: {}", e);
                ApiResponse::error(e.to_string())
            }
        }
    }
}
