// scopesync-api: Async Rust client for the SD-WAN controller management API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod dhcp;
mod sites;

pub use auth::Credentials;
pub use client::ApiClient;
pub use error::Error;
pub use models::{DhcpScope, ItemList, ScopeCreate, Site, TenantProfile};
pub use transport::{TlsMode, TransportConfig};
