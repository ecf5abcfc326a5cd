// Controller HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, the `{ count, items }`
// envelope, and `_error` payload parsing. Endpoint modules (sites, dhcp)
// are implemented as inherent methods via separate files to keep this
// module focused on transport mechanics.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::models::TenantProfile;
use crate::transport::TransportConfig;

// ── Wire shapes private to the transport layer ───────────────────────

#[derive(serde::Deserialize)]
struct LoginResponse {
    #[serde(default)]
    x_auth_token: Option<String>,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default, rename = "_error")]
    errors: Vec<ErrorDetail>,
}

#[derive(serde::Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// How the current session came to exist. Login sessions are the
/// program's to end; operator tokens must survive the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Session {
    OperatorToken,
    Login,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the controller management API.
///
/// Authenticates via the `X-Auth-Token` header (injected as a default
/// header) and communicates over JSON REST endpoints under `/v2.x/api/`.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a pre-existing operator auth token.
    pub fn with_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = Self::token_client(token, transport)?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            session: Session::OperatorToken,
        })
    }

    /// Authenticate with email + password and build a client around the
    /// token the controller hands back.
    ///
    /// `POST /v2.0/api/login` — the response carries `x_auth_token`, which
    /// is then injected as a default header like an operator token would be.
    pub async fn login(
        base_url: &str,
        email: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base = Self::normalize_base_url(base_url)?;
        let url = base
            .join("v2.0/api/login")
            .expect("path should be valid relative URL");

        debug!("logging in at {url}");

        let http = transport.build_client()?;
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = http.post(url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let body = resp.text().await?;
        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        let token = login.x_auth_token.ok_or_else(|| Error::Authentication {
            message: "login response carried no auth token".into(),
        })?;

        debug!("login successful");

        Ok(Self {
            http: Self::token_client(&SecretString::from(token), transport)?,
            base_url: base,
            session: Session::Login,
        })
    }

    /// Connect with either credential flavor and validate the session by
    /// fetching the tenant profile.
    ///
    /// A session with no associated tenant cannot perform inventory
    /// operations, so it is reported as an authentication failure here
    /// rather than as a confusing empty inventory later.
    pub async fn connect(
        base_url: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<(Self, TenantProfile), Error> {
        let client = match credentials {
            Credentials::Token(token) => Self::with_token(base_url, token, transport)?,
            Credentials::Login { email, password } => {
                Self::login(base_url, email, password, transport).await?
            }
        };

        let profile = client.profile().await?;
        if profile.tenant_id.is_none() {
            return Err(Error::Authentication {
                message: "session has no tenant associated -- check the auth token".into(),
            });
        }

        Ok((client, profile))
    }

    fn token_client(
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        let mut value =
            HeaderValue::from_str(token.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid auth token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert("X-Auth-Token", value);
        transport.build_client_with_headers(headers)
    }

    /// Parse and normalize the controller base URL to end with `/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether this client created its own session (login flow) and
    /// should log out when the run finishes.
    pub fn owns_session(&self) -> bool {
        self.session == Session::Login
    }

    // ── Session endpoints ────────────────────────────────────────────

    /// Fetch the session's tenant profile. `GET /v2.0/api/profile`
    pub async fn profile(&self) -> Result<TenantProfile, Error> {
        self.get("v2.0/api/profile").await
    }

    /// End the current session. `GET /v2.0/api/logout`
    ///
    /// Callers are expected to skip this for operator-token sessions
    /// (see [`owns_session`](Self::owns_session)).
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.url("v2.0/api/logout");
        debug!("logging out at {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!("logout returned HTTP {status}, ignoring");
        }
        Ok(())
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"v2.1/api/sites"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining a relative path works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Map a non-success response to an error, preferring the structured
    /// `{ "_error": [{ code, message }] }` payload when present.
    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::Authentication {
                message: format!("controller rejected the session (HTTP {status})"),
            };
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(body) = serde_json::from_str::<ErrorBody>(&raw) {
            if let Some(detail) = body.errors.into_iter().next() {
                return Error::Api {
                    status: status.as_u16(),
                    message: detail.message.unwrap_or_else(|| status.to_string()),
                    code: detail.code,
                };
            }
        }

        Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
            code: None,
        }
    }
}
