// DHCP scope endpoints
//
// Scope collections are site-scoped: `/v2.1/api/sites/{site_id}/dhcpservers`.
// Reads return records with all controller-assigned system fields attached;
// creates expect a payload with those fields already stripped.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{DhcpScope, ItemList, ScopeCreate};

impl ApiClient {
    /// List the DHCP scopes configured at one site.
    ///
    /// `GET /v2.1/api/sites/{site_id}/dhcpservers`
    pub async fn list_dhcp_scopes(&self, site_id: &str) -> Result<Vec<DhcpScope>, Error> {
        debug!(site_id, "listing dhcp scopes");
        let list: ItemList<DhcpScope> = self
            .get(&format!("v2.1/api/sites/{site_id}/dhcpservers"))
            .await?;
        Ok(list.items)
    }

    /// Create a new DHCP scope at a site.
    ///
    /// `POST /v2.1/api/sites/{site_id}/dhcpservers`
    pub async fn create_dhcp_scope(
        &self,
        site_id: &str,
        scope: &ScopeCreate,
    ) -> Result<DhcpScope, Error> {
        debug!(site_id, subnet = %scope.subnet, "creating dhcp scope");
        self.post(&format!("v2.1/api/sites/{site_id}/dhcpservers"), scope)
            .await
    }
}
