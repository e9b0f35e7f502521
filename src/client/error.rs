//! Errors returned by endpoint operations.

use std::fmt;

use http::StatusCode;
use serde_json::Value;

use crate::auth::CredentialStoreError;

/// Everything an endpoint call can fail with.
///
/// No retries happen below this type; callers decide what to do with it.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Server answered with a non-2xx status
    Status {
        status: StatusCode,
        /// Parsed JSON body, the raw text as a JSON string, or `Null` if empty
        body: Value,
    },
    /// Request did not complete within the configured timeout
    Timeout(String),
    /// Connection, TLS, or protocol failure before a response arrived
    Transport(String),
    /// Credential store could not be read and the policy is fail-closed
    Credential(CredentialStoreError),
    /// Endpoint URL could not be built from the base URL
    InvalidUrl(String),
    /// Request body or query could not be serialized
    Encode(String),
    /// Successful response body did not match the expected shape
    Decode { status: StatusCode, message: String },
}

impl ApiError {
    /// Classify a reqwest failure.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_builder() {
            Self::Encode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of a non-2xx answer.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The server's error body when there is one, otherwise the message.
    pub fn detail(&self) -> String {
        match self.body() {
            Some(Value::Null) | None => self.to_string(),
            Some(Value::String(text)) if text.is_empty() => self.to_string(),
            Some(Value::String(text)) => text.clone(),
            Some(body) => body.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, .. } => write!(f, "Request failed with status {}", status),
            Self::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            Self::Transport(msg) => write!(f, "Request failed: {}", msg),
            Self::Credential(err) => write!(f, "Could not read credentials: {}", err),
            Self::InvalidUrl(msg) => write!(f, "Invalid endpoint URL: {}", msg),
            Self::Encode(msg) => write!(f, "Could not encode request: {}", msg),
            Self::Decode { status, message } => {
                write!(f, "Could not decode {} response: {}", status, message)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Credential(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CredentialStoreError> for ApiError {
    fn from(err: CredentialStoreError) -> Self {
        Self::Credential(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_prefers_body() {
        let err = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: json!({ "message": "Invalid token" }),
        };
        assert_eq!(err.detail(), r#"{"message":"Invalid token"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_detail_falls_back_to_message() {
        let err = ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: Value::Null,
        };
        assert_eq!(err.detail(), "Request failed with status 502 Bad Gateway");

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.detail(), "Request failed: connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_detail_returns_plain_text_body() {
        let err = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Value::String("boom".to_string()),
        };
        assert_eq!(err.detail(), "boom");
    }

    #[test]
    fn test_credential_error_converts() {
        let err: ApiError = CredentialStoreError::Poisoned.into();
        assert_eq!(
            err.to_string(),
            "Could not read credentials: Credential store lock poisoned"
        );
    }
}
