//! MCP server for the CRM follow-up tools.

pub mod handlers;

pub use handlers::{CrmFollowupServer, UpdateContactDatesParams};

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the server over stdio until the client disconnects.
pub async fn run_server(server: CrmFollowupServer) -> Result<()> {
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
