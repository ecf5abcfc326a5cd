//! CLI configuration: TOML profiles, credential resolution, and
//! translation to a controller connection.
//!
//! Credentials resolve through a chain -- CLI flag, profile-named env
//! var, well-known env vars, system keyring, plaintext profile value --
//! so tokens never need to live in the config file. The `X_AUTH_TOKEN` /
//! `AUTH_TOKEN` names older operator tooling exported are honored as a
//! fallback (see `scopesync_api::auth`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use scopesync_api::{Credentials, TlsMode, TransportConfig, auth};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            profiles: HashMap::new(),
        }
    }
}

/// A named controller profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g. "https://api.sdwan.example.com").
    pub controller: String,

    /// Auth token (plaintext -- prefer keyring or env var).
    pub auth_token: Option<String>,

    /// Environment variable name containing the auth token.
    pub auth_token_env: Option<String>,

    /// Login email, for operators without a static token.
    pub email: Option<String>,

    /// Login password (plaintext -- prefer keyring or SCOPESYNC_PASSWORD).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed certificates for this controller.
    pub insecure: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "scopesync", "scopesync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("scopesync");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("SCOPESYNC_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

// ── Connection resolution ───────────────────────────────────────────

/// A fully resolved controller connection: where, as whom, and how.
pub struct Connection {
    pub controller: String,
    pub credentials: Credentials,
    pub transport: TransportConfig,
}

/// Build a `Connection` from the config file, active profile, and CLI
/// flag overrides. Flags take priority over profile values.
pub fn resolve_connection(global: &GlobalOpts) -> Result<Connection, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let controller = global
            .controller
            .clone()
            .unwrap_or_else(|| profile.controller.clone());
        return Ok(Connection {
            controller,
            credentials: resolve_credentials(Some(profile), &profile_name, global)?,
            transport: transport_config(global, Some(profile)),
        });
    }

    // A profile was named explicitly but doesn't exist.
    if global.profile.is_some() {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available.join(", "),
        });
    }

    // No profile at all -- build from CLI flags / env vars alone.
    let controller = global.controller.clone().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    Ok(Connection {
        controller,
        credentials: resolve_credentials(None, &profile_name, global)?,
        transport: transport_config(global, None),
    })
}

/// Walk the credential chain: flag > profile env var > well-known env
/// vars > keyring > plaintext profile > login email + password.
fn resolve_credentials(
    profile: Option<&Profile>,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<Credentials, CliError> {
    // 1. CLI flag
    if let Some(ref token) = global.auth_token {
        return Ok(Credentials::Token(SecretString::from(token.clone())));
    }

    // 2. Profile's auth_token_env -> env var lookup
    if let Some(env_name) = profile.and_then(|p| p.auth_token_env.as_deref()) {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(Credentials::Token(SecretString::from(val)));
        }
    }

    // 3. Well-known env vars (SCOPESYNC_AUTH_TOKEN, X_AUTH_TOKEN, AUTH_TOKEN)
    if let Some(token) = auth::token_from_env() {
        return Ok(Credentials::Token(token));
    }

    // 4. System keyring
    if let Ok(entry) = keyring::Entry::new("scopesync", &format!("{profile_name}/auth-token")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(Credentials::Token(SecretString::from(secret)));
        }
    }

    // 5. Plaintext token in config
    if let Some(token) = profile.and_then(|p| p.auth_token.as_deref()) {
        return Ok(Credentials::Token(SecretString::from(token.to_owned())));
    }

    // 6. Login flow: email flag/profile + password env/keyring/plaintext
    let email = global
        .email
        .clone()
        .or_else(|| profile.and_then(|p| p.email.clone()));
    if let Some(email) = email {
        let password = resolve_password(profile, profile_name)?;
        return Ok(Credentials::Login { email, password });
    }

    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn resolve_password(
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<SecretString, CliError> {
    if let Ok(pw) = std::env::var("SCOPESYNC_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    if let Ok(entry) = keyring::Entry::new("scopesync", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    if let Some(pw) = profile.and_then(|p| p.password.as_deref()) {
        return Ok(SecretString::from(pw.to_owned()));
    }

    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn transport_config(global: &GlobalOpts, profile: Option<&Profile>) -> TransportConfig {
    let tls = if global.insecure || profile.and_then(|p| p.insecure).unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.clone()) {
        TlsMode::CustomCa(ca_path)
    } else {
        TlsMode::System
    };

    TransportConfig {
        tls,
        timeout: Duration::from_secs(global.timeout),
    }
}
