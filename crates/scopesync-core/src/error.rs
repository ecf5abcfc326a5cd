// ── Core error types ──
//
// Reconciliation-level errors. The first three variants are fatal to the
// whole run; `MalformedScope` and `ScopeCreate` are scoped to a single
// record and are converted into reported outcomes at the scope boundary
// rather than propagated. The `From<scopesync_api::Error>` impl covers
// failures outside the fetch stage (site listing, session).

use thiserror::Error;

/// Unified error type for the reconciliation engine.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Resolution stage (fatal) ─────────────────────────────────────
    #[error("Site not found: {name}")]
    SiteNotFound { name: String },

    #[error("Site name '{name}' matches {matches} sites -- names must be unique to resolve")]
    AmbiguousSiteName { name: String, matches: usize },

    // ── Fetch stage (fatal) ──────────────────────────────────────────
    #[error("Failed to fetch DHCP scope inventory for site '{site}': {source}")]
    InventoryFetch {
        site: String,
        #[source]
        source: scopesync_api::Error,
    },

    // ── Per-scope stages (contained at the scope boundary) ───────────
    #[error("Scope record {id} has no subnet")]
    MalformedScope { id: String },

    #[error("Failed to create DHCP scope for subnet {subnet}: {source}")]
    ScopeCreate {
        subnet: String,
        #[source]
        source: scopesync_api::Error,
    },

    // ── Transport / session (fatal) ──────────────────────────────────
    #[error(transparent)]
    Api(#[from] scopesync_api::Error),
}
