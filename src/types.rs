//! NewType wrappers for the identifiers the backend hands out.
//!
//! These keep a user id from being passed where a conversation id is
//! expected when building endpoint paths.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// String-backed id used to build request paths.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Path-segment form of the id.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserialize_id(deserializer).map(Self)
            }
        }
    };
}

/// The backend's JSON store writes ids as strings in some places and as
/// numbers in others, so ids accept either and are kept as strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(s) => Ok(s),
        RawId::Number(n) => Ok(n.to_string()),
    }
}

newtype_string!(
    /// User id as it appears in onboarding and admin paths.
    UserId
);

/// A user id exactly as the backend stored it.
///
/// The JSON user store holds numeric ids for some records and string ids for
/// others. Credentials must carry the id with its original JSON type, since
/// the backend matches `userId` against the store with strict equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredId {
    Number(serde_json::Number),
    Text(String),
}

impl StoredId {
    /// String form, for use as a path segment.
    pub fn to_user_id(&self) -> UserId {
        UserId::new(self.to_string())
    }
}

impl fmt::Display for StoredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for StoredId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for StoredId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u64> for StoredId {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<UserId> for StoredId {
    fn from(id: UserId) -> Self {
        Self::Text(id.into_inner())
    }
}

newtype_string!(
    /// Identifier of a connected social-media account.
    AccountId
);

newtype_string!(
    /// Identifier of a conversation thread.
    ConversationId
);
