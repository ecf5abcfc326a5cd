// Controller API response types
//
// All list endpoints wrap their payload in the `ItemList<T>` envelope.
// Fields use `#[serde(default)]` liberally because the controller is
// inconsistent about field presence across API versions; unknown fields
// are collected in flattened catch-all maps.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard list-response envelope:
/// ```json
/// { "count": 2, "items": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct ItemList<T> {
    #[serde(default)]
    pub count: Option<u64>,
    pub items: Vec<T>,
}

// ── Site ─────────────────────────────────────────────────────────────

/// Branch site object from `/v2.1/api/sites`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub admin_state: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── DHCP Scope ───────────────────────────────────────────────────────

/// DHCP scope record from `/v2.1/api/sites/{site_id}/dhcpservers`.
///
/// Only `id` and `subnet` are modeled explicitly; every other key —
/// configuration fields (lease time, options, ranges) and the remaining
/// controller-assigned system fields alike — lands in `fields` verbatim.
/// `subnet` stays optional at the type level so a malformed record fails
/// at the sanitize stage for that one scope rather than failing the
/// whole inventory fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DhcpScope {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub subnet: Option<String>,
    /// Everything else, copied as-is.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Sanitized create payload: a scope with all system fields removed.
///
/// Serializes flat — `subnet` alongside the configuration map — matching
/// the shape `POST .../dhcpservers` expects.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeCreate {
    pub subnet: String,
    #[serde(flatten)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

// ── Tenant profile ───────────────────────────────────────────────────

/// Session profile from `/v2.0/api/profile`.
///
/// A session that authenticated successfully but carries no `tenant_id`
/// is unusable for inventory operations; callers treat that as an
/// authentication failure.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantProfile {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
