use secrecy::SecretString;

/// Credentials for authenticating with the controller.
///
/// Each variant carries the secret material needed for its flow.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Static operator auth token, sent as `X-Auth-Token` on every request.
    /// The session outlives the program; logout is never issued for it.
    Token(SecretString),

    /// Email + password login. The program creates the session via
    /// `POST /v2.0/api/login` and ends it with a logout when the run finishes.
    Login {
        email: String,
        password: SecretString,
    },
}

impl Credentials {
    /// Whether this credential creates a session the program owns
    /// (and should therefore log out of).
    pub fn owns_session(&self) -> bool {
        matches!(self, Self::Login { .. })
    }
}

/// Environment variables consulted for an auth token, in priority order.
///
/// `X_AUTH_TOKEN` and `AUTH_TOKEN` are the names older operator tooling
/// exported; they are honored so existing automation keeps working.
pub const TOKEN_ENV_VARS: &[&str] = &["SCOPESYNC_AUTH_TOKEN", "X_AUTH_TOKEN", "AUTH_TOKEN"];

/// Look up an auth token from the environment.
pub fn token_from_env() -> Option<SecretString> {
    TOKEN_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .map(SecretString::from)
}
