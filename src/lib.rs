// Typed client for the workflow backend
pub mod api;
pub mod auth;
mod client;
pub mod config;
pub mod model;
pub mod probe;
pub mod types;

// Re-export key types and functions
pub use auth::{
    Claims, CredentialStore, CredentialStoreError, FileCredentialStore, MemoryCredentialStore,
    TokenError, TokenSigner,
};
pub use client::{ApiClient, ApiError, ApiResponse, RequestDescriptor};
pub use config::{ClientConfig, CredentialPolicy, ProbeConfig};
pub use probe::{ProbeError, ProbeOutcome, ProbeReport, run_probe};
pub use types::{AccountId, ConversationId, StoredId, UserId};

use std::sync::Arc;

/// Build a client from `VITE_API_URL` that reads its token from `store`.
pub fn client_from_env(store: Arc<dyn CredentialStore>) -> anyhow::Result<ApiClient> {
    let config = ClientConfig::from_env()?;
    Ok(ApiClient::new(config, store)?)
}
