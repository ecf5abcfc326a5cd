//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text. Per-scope failures never surface here -- they live inside the
//! run report and exit zero; only hard aborts become `CliError`s.

use miette::Diagnostic;
use thiserror::Error;

use scopesync_core::CoreError;

/// Exit codes. Hard aborts (resolution, fetch, connection, auth, config)
/// are the only non-zero exits; a run with individual scope failures
/// still exits zero with its summary printed.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(scopesync::connection_failed),
        help(
            "Check that the controller is reachable.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(scopesync::auth_failed),
        help(
            "Verify the auth token or login credentials.\n\
             Run: scopesync config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(scopesync::no_credentials),
        help(
            "Configure credentials with: scopesync config init\n\
             Or set the SCOPESYNC_AUTH_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resolution ───────────────────────────────────────────────────

    #[error("Site '{name}' not found in the tenant")]
    #[diagnostic(
        code(scopesync::site_not_found),
        help("Run: scopesync sites list to see available sites")
    )]
    SiteNotFound { name: String },

    #[error("Site name '{name}' matches {matches} sites")]
    #[diagnostic(
        code(scopesync::ambiguous_site),
        help("Site names must be unique to resolve; rename the duplicates on the controller.")
    )]
    AmbiguousSite { name: String, matches: usize },

    // ── Fetch ────────────────────────────────────────────────────────

    #[error("Failed to fetch the DHCP scope inventory for site '{site}'")]
    #[diagnostic(
        code(scopesync::inventory_fetch),
        help("The run was aborted before any scope was created; re-run once the controller recovers.")
    )]
    InventoryFetch {
        site: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(scopesync::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(scopesync::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(scopesync::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: scopesync config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(scopesync::no_config),
        help(
            "Create one with: scopesync config init\n\
             Expected at: {path}\n\
             Or pass --controller and --auth-token directly."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(scopesync::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(scopesync::config_write))]
    TomlSerialize(#[from] toml::ser::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::SiteNotFound { .. } => exit_code::NOT_FOUND,
            Self::AmbiguousSite { .. } => exit_code::CONFLICT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SiteNotFound { name } => CliError::SiteNotFound { name },

            CoreError::AmbiguousSiteName { name, matches } => {
                CliError::AmbiguousSite { name, matches }
            }

            CoreError::InventoryFetch { site, source } => CliError::InventoryFetch {
                site,
                source: source.into(),
            },

            // Per-scope errors are contained inside the run report; if one
            // reaches here anyway, surface it as a plain API error.
            CoreError::MalformedScope { .. } | CoreError::ScopeCreate { .. } => {
                CliError::ApiError {
                    code: "scope".into(),
                    message: err.to_string(),
                }
            }

            CoreError::Api(api) => CliError::from(api),
        }
    }
}

impl From<scopesync_api::Error> for CliError {
    fn from(err: scopesync_api::Error) -> Self {
        match err {
            scopesync_api::Error::Authentication { message } => CliError::AuthFailed { message },

            scopesync_api::Error::Transport(e) => {
                if e.is_connect() || e.is_timeout() {
                    CliError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        source: e.into(),
                    }
                } else {
                    CliError::ApiError {
                        code: "transport".into(),
                        message: e.to_string(),
                    }
                }
            }

            scopesync_api::Error::InvalidUrl(e) => CliError::Validation {
                field: "controller".into(),
                reason: e.to_string(),
            },

            scopesync_api::Error::Tls(message) => CliError::ConnectionFailed {
                url: "<controller>".into(),
                source: message.into(),
            },

            scopesync_api::Error::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code.unwrap_or_else(|| format!("http-{status}")),
                message,
            },

            scopesync_api::Error::Deserialization { message, body: _ } => CliError::ApiError {
                code: "deserialization".into(),
                message,
            },
        }
    }
}
