// Site endpoints
//
// Site listing is tenant-scoped, not site-scoped: the controller returns
// every branch site visible to the authenticated session.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ItemList, Site};

impl ApiClient {
    /// List all sites in the tenant.
    ///
    /// `GET /v2.1/api/sites`
    pub async fn list_sites(&self) -> Result<Vec<Site>, Error> {
        debug!("listing sites");
        let list: ItemList<Site> = self.get("v2.1/api/sites").await?;
        Ok(list.items)
    }
}
