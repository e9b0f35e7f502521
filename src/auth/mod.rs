//! Credentials for talking to the workflow backend.
//!
//! - **Tokens**: HS256 bearer tokens with a `userId` claim and a seven day
//!   lifetime, minted and verified with a shared secret.
//! - **Credential stores**: where the client looks up the token it attaches
//!   to outgoing requests (in memory or a JSON file on disk).
//!
//! ## Usage
//!
//! ```ignore
//! let signer = TokenSigner::from_env()?;
//! let token = signer.issue(&StoredId::from(42u64))?;
//! let store = MemoryCredentialStore::with_token(token);
//! ```

mod credential_store;
pub mod token;

pub use credential_store::{
    CredentialStore, CredentialStoreError, FileCredentialStore, MemoryCredentialStore,
};
pub use token::{Claims, TOKEN_LIFETIME_SECONDS, TokenError, TokenSigner};
