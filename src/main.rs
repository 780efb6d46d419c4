//! CRM Follow-up Server - Main entry point
//!
//! This is the main executable for the CRM Follow-up Server, which provides a Model
//! Context Protocol (MCP) interface to follow-up scheduling on a Frappe CRM site.

use anyhow::Result;
use crm_followup_server::client::{AsyncFrappeClient, AsyncFrappeClientImpl};
use crm_followup_server::events::{event_bus, BroadcastPublisher, EventPublisher};
use crm_followup_server::repositories::{
    CallLogRepository, ContactRepository, DealRepository, FrappeCallLogRepository,
    FrappeContactRepository, FrappeDealRepository, FrappeHolidayRepository, FrappeLeadRepository,
    FrappePermissionChecker, HolidayRepository, LeadRepository, PermissionChecker,
};
use crm_followup_server::services::{
    CalendarService, CalendarServiceImpl, ContactService, ContactServiceImpl, LeadIntakeService,
    LeadIntakeServiceImpl, ScheduledCallService, ScheduledCallServiceImpl,
};
use crm_followup_server::{Config, CrmFollowupServer, FrappeClient};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting CRM Follow-up Server with API URL: {}",
        config.crm_api_url
    );

    // Initialize site client
    let sync_client = FrappeClient::new(&config);
    let metrics = sync_client.metrics().clone();
    let client = Arc::new(AsyncFrappeClientImpl::new(sync_client)) as Arc<dyn AsyncFrappeClient>;

    // Initialize repositories
    let contact_repo =
        Arc::new(FrappeContactRepository::new(client.clone())) as Arc<dyn ContactRepository>;
    let deal_repo = Arc::new(FrappeDealRepository::new(client.clone())) as Arc<dyn DealRepository>;
    let call_log_repo =
        Arc::new(FrappeCallLogRepository::new(client.clone())) as Arc<dyn CallLogRepository>;
    let lead_repo = Arc::new(FrappeLeadRepository::new(client.clone())) as Arc<dyn LeadRepository>;
    let holiday_repo =
        Arc::new(FrappeHolidayRepository::new(client.clone())) as Arc<dyn HolidayRepository>;
    let permissions =
        Arc::new(FrappePermissionChecker::new(client.clone())) as Arc<dyn PermissionChecker>;

    // Realtime events are logged until a client transport subscribes
    let (sender, _) = event_bus(config.event_channel_capacity);
    let publisher = BroadcastPublisher::new(sender);
    let mut events = publisher.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => info!(event = %event.name, payload = %event.payload, "Realtime event"),
                Err(RecvError::Lagged(skipped)) => warn!("Event log lagged, {} events skipped", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
    let publisher = Arc::new(publisher) as Arc<dyn EventPublisher>;

    // Initialize services
    let calendar = Arc::new(CalendarServiceImpl::new(
        holiday_repo,
        config.holiday_cache_ttl_minutes,
    )) as Arc<dyn CalendarService>;
    let contact_service = Arc::new(ContactServiceImpl::new(
        contact_repo.clone(),
        deal_repo.clone(),
        permissions,
        calendar.clone(),
    )) as Arc<dyn ContactService>;
    let scheduled_calls = Arc::new(ScheduledCallServiceImpl::new(
        contact_repo,
        call_log_repo,
        publisher,
        config.session_user.clone(),
    )) as Arc<dyn ScheduledCallService>;
    let lead_intake = Arc::new(LeadIntakeServiceImpl::new(
        lead_repo,
        deal_repo,
        config.session_user.clone(),
    )) as Arc<dyn LeadIntakeService>;

    let server = CrmFollowupServer::new(contact_service, scheduled_calls, lead_intake, calendar);

    info!("CRM Follow-up Server initialized");
    info!(
        "Holiday cache TTL: {} minutes, session user: {}",
        config.holiday_cache_ttl_minutes, config.session_user
    );

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    crm_followup_server::server::run_server(server).await?;

    let summary = metrics.summary();
    info!(
        requests = summary.http_requests_total,
        errors = summary.http_errors_total,
        avg_ms = summary.http_duration_avg_ms,
        read = summary.documents_read_total,
        written = summary.documents_written_total,
        "CRM Follow-up Server shutdown complete"
    );
    Ok(())
}
