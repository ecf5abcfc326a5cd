//! Scope sanitization: strip controller-assigned system fields so a
//! record fetched from one site can be resubmitted as a *new* object at
//! another. Submitting an unsanitized record would carry the identity
//! and provenance of the originating object.

use scopesync_api::{DhcpScope, ScopeCreate};

use crate::error::CoreError;

/// The fixed set of controller-assigned field names stripped before
/// resubmission. A record missing any of these is treated as already
/// clean.
pub const SYSTEM_FIELDS: &[&str] = &[
    "id",
    "_etag",
    "_schema",
    "_created_on_utc",
    "_updated_on_utc",
    "_debug",
    "_info",
    "_warning",
    "_error",
];

/// Build a create payload from a fetched scope record.
///
/// Returns a new record -- the input is never mutated. Fails only when
/// the record has no `subnet`, the one field the rest of the pipeline
/// depends on.
pub fn sanitize(scope: &DhcpScope) -> Result<ScopeCreate, CoreError> {
    let subnet = scope.subnet.clone().ok_or_else(|| CoreError::MalformedScope {
        id: scope.id.clone().unwrap_or_else(|| "<no id>".into()),
    })?;

    let mut config = scope.fields.clone();
    for field in SYSTEM_FIELDS {
        config.remove(*field);
    }

    Ok(ScopeCreate { subnet, config })
}
