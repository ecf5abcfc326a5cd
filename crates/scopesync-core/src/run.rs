//! The reconciliation run: resolve -> fetch -> diff -> sanitize ->
//! replicate -> report.
//!
//! Strictly sequential: every network call completes before the next
//! begins, so output and report ordering are deterministic. No retries
//! anywhere -- the recovery path is re-running the whole reconciliation,
//! which the diff makes idempotent.

use tracing::{debug, info, warn};

use scopesync_api::{ApiClient, DhcpScope};

use crate::diff;
use crate::error::CoreError;
use crate::report::{RunReport, ScopeOutcome, ScopeStatus};
use crate::resolve;
use crate::sanitize;

/// Run one reconciliation pass from `source_name` to `destination_name`.
///
/// Resolution and inventory fetch failures abort the run before any
/// create is attempted. Per-scope failures (malformed record, create
/// rejected) are recorded as outcomes and never stop the remaining
/// scopes. Pre-existing destination scopes are never modified.
pub async fn reconcile(
    client: &ApiClient,
    source_name: &str,
    destination_name: &str,
) -> Result<RunReport, CoreError> {
    // Both endpoints must resolve before any scope I/O.
    let sites = client.list_sites().await?;
    let pair = resolve::resolve_pair(&sites, source_name, destination_name)?;
    info!(
        source = %pair.source.id,
        destination = %pair.destination.id,
        "resolved site pair"
    );

    let source_scopes = client
        .list_dhcp_scopes(&pair.source.id)
        .await
        .map_err(|e| CoreError::InventoryFetch {
            site: pair.source.name.clone(),
            source: e,
        })?;
    let destination_scopes = client
        .list_dhcp_scopes(&pair.destination.id)
        .await
        .map_err(|e| CoreError::InventoryFetch {
            site: pair.destination.name.clone(),
            source: e,
        })?;
    debug!(
        source = source_scopes.len(),
        destination = destination_scopes.len(),
        "fetched scope inventories"
    );

    let present = diff::subnet_index(&destination_scopes);

    let mut outcomes = Vec::with_capacity(source_scopes.len());
    for scope in &source_scopes {
        let outcome = match scope.subnet.as_deref() {
            Some(subnet) if present.contains(subnet) => {
                debug!(subnet, "already configured at destination");
                ScopeOutcome {
                    subnet: Some(subnet.to_owned()),
                    status: ScopeStatus::AlreadyPresent,
                }
            }
            _ => replicate_one(client, &pair.destination.id, scope).await,
        };
        outcomes.push(outcome);
    }

    Ok(RunReport {
        source: pair.source,
        destination: pair.destination,
        outcomes,
    })
}

/// Sanitize and submit a single missing scope.
///
/// All failure modes collapse into a `Failed` outcome here -- this is
/// the scope boundary that keeps one bad record from aborting the rest
/// of the run.
async fn replicate_one(client: &ApiClient, destination_id: &str, scope: &DhcpScope) -> ScopeOutcome {
    let payload = match sanitize::sanitize(scope) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "skipping malformed scope record");
            return ScopeOutcome {
                subnet: scope.subnet.clone(),
                status: ScopeStatus::Failed {
                    detail: e.to_string(),
                },
            };
        }
    };

    match client.create_dhcp_scope(destination_id, &payload).await {
        Ok(_) => {
            info!(subnet = %payload.subnet, "created scope at destination");
            ScopeOutcome {
                subnet: Some(payload.subnet),
                status: ScopeStatus::Created,
            }
        }
        Err(e) => {
            let err = CoreError::ScopeCreate {
                subnet: payload.subnet.clone(),
                source: e,
            };
            warn!(error = %err, "scope create failed, continuing");
            ScopeOutcome {
                subnet: Some(payload.subnet),
                status: ScopeStatus::Failed {
                    detail: err.to_string(),
                },
            }
        }
    }
}
