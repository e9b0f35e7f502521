use std::{env, path::PathBuf, time::Duration};

use url::Url;

/// Base URL used when `VITE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5001";

/// Server the token probe talks to when nothing else is configured.
pub const DEFAULT_PROBE_TARGET: &str = "http://localhost:5000";

/// Users file read by the token probe, relative to the working directory.
pub const DEFAULT_USERS_FILE: &str = "workflow-backend/db/users.json";

/// Key under which the bearer token lives in a credential store.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// What the client does when the credential store cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialPolicy {
    /// Abort the request with `ApiError::Credential`.
    #[default]
    FailClosed,
    /// Log a warning and send the request without `Authorization`.
    FailOpen,
}

/// Immutable configuration for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Keep cookies across requests (the browser's `withCredentials`).
    pub with_credentials: bool,
    pub user_agent: String,
    /// Per-request timeout. `None` leaves requests pending until the
    /// transport gives up.
    pub timeout: Option<Duration>,
    pub credential_policy: CredentialPolicy,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            with_credentials: true,
            user_agent: format!("workflow-api/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            credential_policy: CredentialPolicy::default(),
        }
    }

    /// Resolve the base URL from `VITE_API_URL`, falling back to
    /// [`DEFAULT_API_URL`].
    pub fn from_env() -> anyhow::Result<Self> {
        let raw = env::var("VITE_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self::new(parse_base_url(&raw)?))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_credential_policy(mut self, policy: CredentialPolicy) -> Self {
        self.credential_policy = policy;
        self
    }
}

/// Settings for a single token probe run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub users_file: PathBuf,
    pub target: Url,
    pub secret: String,
}

impl ProbeConfig {
    pub fn new(users_file: PathBuf, target: Url, secret: impl Into<String>) -> Self {
        Self {
            users_file,
            target,
            secret: secret.into(),
        }
    }
}

/// Parse a base URL and reject anything that is not http(s) with a host.
pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("Invalid base URL `{}`: {}", raw, e))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(anyhow::anyhow!(
                "Unsupported scheme `{}` in base URL `{}`",
                other,
                raw
            ));
        }
    }

    if url.host().is_none() {
        return Err(anyhow::anyhow!("Base URL `{}` has no host", raw));
    }

    Ok(url)
}

/// Resolve the users file: explicit argument, then `PROBE_USERS_FILE`, then
/// [`DEFAULT_USERS_FILE`].
pub fn resolve_users_file_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(p) = explicit {
        return p;
    }

    if let Ok(p) = env::var("PROBE_USERS_FILE")
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }

    PathBuf::from(DEFAULT_USERS_FILE)
}
