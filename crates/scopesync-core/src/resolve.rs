//! Site-name resolution over the tenant's site inventory.
//!
//! Both endpoints of a clone resolve before any scope I/O begins -- the
//! engine never issues scope calls against a half-resolved pair.

use serde::Serialize;

use scopesync_api::Site;

use crate::error::CoreError;

/// A site name resolved to its controller-assigned identifier.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSite {
    pub id: String,
    pub name: String,
}

/// The resolved endpoints of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct SitePair {
    pub source: ResolvedSite,
    pub destination: ResolvedSite,
}

/// Resolve a single site name to its identifier.
///
/// The controller does not enforce name uniqueness within a tenant, so a
/// name matching more than one site is an error rather than a silent
/// first-match.
pub fn resolve_site(sites: &[Site], name: &str) -> Result<ResolvedSite, CoreError> {
    let mut matches = sites.iter().filter(|s| s.name == name);

    let Some(site) = matches.next() else {
        return Err(CoreError::SiteNotFound { name: name.into() });
    };

    let extra = matches.count();
    if extra > 0 {
        return Err(CoreError::AmbiguousSiteName {
            name: name.into(),
            matches: extra + 1,
        });
    }

    Ok(ResolvedSite {
        id: site.id.clone(),
        name: site.name.clone(),
    })
}

/// Resolve both endpoints of a clone from one site listing.
pub fn resolve_pair(
    sites: &[Site],
    source: &str,
    destination: &str,
) -> Result<SitePair, CoreError> {
    Ok(SitePair {
        source: resolve_site(sites, source)?,
        destination: resolve_site(sites, destination)?,
    })
}
