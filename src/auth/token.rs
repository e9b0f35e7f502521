//! Minting and checking of the backend's bearer credentials.
//!
//! The backend issues HS256 tokens carrying a `userId` claim that expire
//! seven days after issuance. The probe mints the same tokens locally so it
//! can call protected endpoints without a signin round trip.

use std::env;
use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::StoredId;

/// Environment variable holding the signing secret.
pub const SECRET_ENV_VAR: &str = "JWT_SECRET";

/// Lifetime of a minted credential (7 days).
pub const TOKEN_LIFETIME_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Claims carried by a workflow credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Kept with the JSON type the user store gave it.
    #[serde(rename = "userId")]
    pub user_id: StoredId,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Token errors.
#[derive(Debug, Clone)]
pub enum TokenError {
    /// No signing secret configured
    MissingSecret,
    /// Signing failed
    Encode(String),
    /// Token is malformed, expired, or signed with another secret
    Invalid(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSecret => write!(
                f,
                "No signing secret configured (set {})",
                SECRET_ENV_VAR
            ),
            Self::Encode(msg) => write!(f, "Failed to sign token: {}", msg),
            Self::Invalid(msg) => write!(f, "Invalid token: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

/// Signs and verifies credentials with a shared HS256 secret.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer. An empty or blank secret is rejected.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::seconds(TOKEN_LIFETIME_SECONDS),
        })
    }

    /// Create a signer from `JWT_SECRET`. There is no fallback secret.
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = env::var(SECRET_ENV_VAR).map_err(|_| TokenError::MissingSecret)?;
        Self::new(&secret)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Mint a token for `user_id`, valid for seven days from now.
    pub fn issue(&self, user_id: &StoredId) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Mint a token as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: &StoredId,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            user_id: user_id.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encode(e.to_string()))?;

        debug!("Issued token for user {} expiring at {}", user_id, claims.exp);
        Ok(token)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_round_trips_user_id_and_expiry() {
        let signer = TokenSigner::new("test-secret").unwrap();
        let user_id = StoredId::from("user-123");

        let before = Utc::now().timestamp();
        let token = signer.issue(&user_id).unwrap();
        let after = Utc::now().timestamp();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECONDS);
        assert!(claims.iat >= before - 1 && claims.iat <= after + 1);
        assert!(claims.exp >= before + TOKEN_LIFETIME_SECONDS - 1);
        assert!(claims.exp <= after + TOKEN_LIFETIME_SECONDS + 1);
    }

    #[test]
    fn test_claims_serialize_user_id_as_camel_case() {
        let claims = Claims {
            user_id: StoredId::from("u1"),
            iat: 10,
            exp: 20,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "u1");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_numeric_user_id_stays_numeric_in_claim() {
        let signer = TokenSigner::new("test-secret").unwrap();
        let token = signer.issue(&StoredId::from(17u64)).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        let raw = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        )
        .unwrap()
        .claims;
        assert_eq!(raw["userId"], serde_json::json!(17));

        let text = signer.issue(&StoredId::from("17")).unwrap();
        assert_eq!(signer.verify(&text).unwrap().user_id, StoredId::from("17"));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(TokenSigner::new(""), Err(TokenError::MissingSecret)));
        assert!(matches!(TokenSigner::new("   "), Err(TokenError::MissingSecret)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let signer = TokenSigner::new("secret-a").unwrap();
        let other = TokenSigner::new("secret-b").unwrap();
        let token = signer.issue(&StoredId::from("u1")).unwrap();

        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let signer = TokenSigner::new("test-secret").unwrap();
        let issued_at = Utc::now() - Duration::days(8);
        let token = signer.issue_at(&StoredId::from("u1"), issued_at).unwrap();

        assert!(matches!(signer.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_claims_timestamps_convert_to_datetimes() {
        let issued_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let claims = Claims {
            user_id: StoredId::from("u1"),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::days(7)).timestamp(),
        };
        assert_eq!(claims.issued_at(), Some(issued_at));
        assert_eq!(
            claims.expires_at(),
            Some(Utc.with_ymd_and_hms(2026, 1, 8, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_from_env_requires_secret() {
        temp_env::with_vars([(SECRET_ENV_VAR, None::<String>)], || {
            assert!(matches!(TokenSigner::from_env(), Err(TokenError::MissingSecret)));
        });

        temp_env::with_vars([(SECRET_ENV_VAR, Some("from-env"))], || {
            let signer = TokenSigner::from_env().unwrap();
            let token = signer.issue(&StoredId::from("u1")).unwrap();
            let claims = TokenSigner::new("from-env").unwrap().verify(&token).unwrap();
            assert_eq!(claims.user_id, StoredId::from("u1"));
        });
    }

    #[test]
    fn test_token_error_display() {
        assert_eq!(
            TokenError::MissingSecret.to_string(),
            "No signing secret configured (set JWT_SECRET)"
        );
        assert_eq!(
            TokenError::Invalid("bad".to_string()).to_string(),
            "Invalid token: bad"
        );
    }
}
