// scopesync-core: the DHCP scope reconciliation engine
//
// Given two branch sites' DHCP scope inventories, create at the
// destination exactly those scopes whose subnet exists only at the
// source, leaving pre-existing destination scopes untouched. One run is
// strictly linear: resolve -> fetch -> diff -> sanitize -> replicate ->
// report. Re-running is always safe: the diff re-derives the missing set
// from current inventories, so a second pass with nothing changed
// creates nothing.

pub mod diff;
pub mod error;
pub mod report;
pub mod resolve;
pub mod run;
pub mod sanitize;

pub use error::CoreError;
pub use report::{RunReport, ScopeOutcome, ScopeStatus};
pub use resolve::{ResolvedSite, SitePair};
pub use run::reconcile;
pub use sanitize::SYSTEM_FIELDS;
