//! Scope inventory command handlers.

use tabled::Tabled;

use scopesync_api::{ApiClient, DhcpScope};
use scopesync_core::CoreError;
use scopesync_core::resolve::resolve_site;

use crate::cli::{GlobalOpts, ScopesArgs, ScopesCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ScopeRow {
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&DhcpScope> for ScopeRow {
    fn from(s: &DhcpScope) -> Self {
        Self {
            subnet: s.subnet.clone().unwrap_or_else(|| "-".into()),
            id: s.id.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: ScopesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ScopesCommand::List { site } => {
            let sites = client.list_sites().await.map_err(CliError::from)?;
            let resolved = resolve_site(&sites, &site).map_err(CliError::from)?;

            let scopes = client
                .list_dhcp_scopes(&resolved.id)
                .await
                .map_err(|e| CoreError::InventoryFetch {
                    site: resolved.name.clone(),
                    source: e,
                })
                .map_err(CliError::from)?;

            let out = output::render_list(
                &global.output,
                &scopes,
                |s| ScopeRow::from(s),
                |s| s.subnet.clone().unwrap_or_else(|| "-".into()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
