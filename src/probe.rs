//! Token probe: mint a credential for a stored user and call the analytics
//! dashboard with it.
//!
//! Reading the users file is fatal on failure; the HTTP call is not. A
//! failed call is reported in [`ProbeOutcome::Failed`] so the caller can log
//! it and still exit cleanly.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::{MemoryCredentialStore, TokenError, TokenSigner};
use crate::client::{ApiClient, ApiError};
use crate::config::{ClientConfig, ProbeConfig};
use crate::model::UserRecord;

/// Errors that stop the probe before any request is sent.
#[derive(Debug, Clone)]
pub enum ProbeError {
    /// Users file could not be read
    UsersFile { path: PathBuf, message: String },
    /// Users file is not a JSON array of user records
    UsersParse { path: PathBuf, message: String },
    /// Users file holds no users
    NoUsers(PathBuf),
    /// Credential could not be minted
    Token(TokenError),
    /// HTTP client could not be built
    Client(ApiError),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsersFile { path, message } => {
                write!(f, "Failed to read users file {}: {}", path.display(), message)
            }
            Self::UsersParse { path, message } => {
                write!(f, "Failed to parse users file {}: {}", path.display(), message)
            }
            Self::NoUsers(path) => write!(f, "No users found in {}", path.display()),
            Self::Token(err) => write!(f, "{}", err),
            Self::Client(err) => write!(f, "Failed to build HTTP client: {}", err),
        }
    }
}

impl std::error::Error for ProbeError {}

impl From<TokenError> for ProbeError {
    fn from(err: TokenError) -> Self {
        Self::Token(err)
    }
}

/// Result of the single analytics call.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    Success { status: StatusCode, data: Value },
    Failed(ApiError),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Everything the probe learned in one run.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub user: UserRecord,
    pub token: String,
    pub outcome: ProbeOutcome,
}

/// Read the users file as a JSON array of user records.
pub fn load_users(path: &Path) -> Result<Vec<UserRecord>, ProbeError> {
    let raw = fs::read_to_string(path).map_err(|e| ProbeError::UsersFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&raw).map_err(|e| ProbeError::UsersParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// First user in the file.
pub fn first_user(path: &Path) -> Result<UserRecord, ProbeError> {
    load_users(path)?
        .into_iter()
        .next()
        .ok_or_else(|| ProbeError::NoUsers(path.to_path_buf()))
}

/// Run the probe once.
///
/// The secret is checked and the user is selected before the client is
/// built, so a bad setup never reaches the network.
pub async fn run_probe(config: &ProbeConfig) -> Result<ProbeReport, ProbeError> {
    let signer = TokenSigner::new(&config.secret)?;
    let user = first_user(&config.users_file)?;
    info!("Using user: {}", user.email);

    let token = signer.issue(&user.id)?;

    let store = Arc::new(MemoryCredentialStore::with_token(token.clone()));
    let client = ApiClient::new(ClientConfig::new(config.target.clone()), store)
        .map_err(ProbeError::Client)?;

    let outcome = match client.analytics().get_dashboard_data().await {
        Ok(response) => {
            info!("Analytics responded with {}", response.status);
            ProbeOutcome::Success {
                status: response.status,
                data: response.data,
            }
        }
        Err(err) => {
            debug!("Analytics call failed: {}", err);
            ProbeOutcome::Failed(err)
        }
    };

    Ok(ProbeReport {
        user,
        token,
        outcome,
    })
}
