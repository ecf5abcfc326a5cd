//! Per-scope outcomes and the whole-run report.
//!
//! Outcomes are recorded in source-inventory order so two runs over the
//! same inventories report identically.

use serde::Serialize;

use crate::resolve::ResolvedSite;

/// What happened to one source scope during the run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ScopeStatus {
    /// The destination already had a scope with this subnet; untouched.
    AlreadyPresent,
    /// A new scope was created at the destination.
    Created,
    /// Sanitization or creation failed; the run continued past it.
    Failed { detail: String },
}

impl ScopeStatus {
    /// Short human-readable label for table and plain output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyPresent => "already present",
            Self::Created => "created",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Outcome of one source scope. `subnet` is `None` only for malformed
/// records that never had one.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeOutcome {
    pub subnet: Option<String>,
    #[serde(flatten)]
    pub status: ScopeStatus,
}

/// Aggregated result of one reconciliation run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub source: ResolvedSite,
    pub destination: ResolvedSite,
    pub outcomes: Vec<ScopeOutcome>,
}

impl RunReport {
    pub fn created(&self) -> usize {
        self.count(|s| matches!(s, ScopeStatus::Created))
    }

    pub fn already_present(&self) -> usize {
        self.count(|s| matches!(s, ScopeStatus::AlreadyPresent))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ScopeStatus::Failed { .. }))
    }

    /// `true` when no per-scope failure was recorded.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&ScopeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}
