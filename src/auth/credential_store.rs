//! Key/value storage the client reads its bearer token from.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};

use crate::config::TOKEN_STORAGE_KEY;

/// Errors raised while reading a credential store.
#[derive(Debug, Clone)]
pub enum CredentialStoreError {
    /// The backing file could not be read or written
    Io(String),
    /// The backing file is not a JSON object of strings
    Parse(String),
    /// Store lock was poisoned by a panicking writer
    Poisoned,
}

impl fmt::Display for CredentialStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "Credential store I/O error: {}", msg),
            Self::Parse(msg) => write!(f, "Credential store is malformed: {}", msg),
            Self::Poisoned => write!(f, "Credential store lock poisoned"),
        }
    }
}

impl std::error::Error for CredentialStoreError {}

/// A string key/value store holding client credentials.
///
/// `Ok(None)` means the key is absent, which is not an error.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError>;

    /// The bearer token, stored under [`TOKEN_STORAGE_KEY`].
    fn token(&self) -> Result<Option<String>, CredentialStoreError> {
        Ok(self
            .get(TOKEN_STORAGE_KEY)?
            .filter(|token| !token.is_empty()))
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a bearer token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.write() {
            entries.insert(TOKEN_STORAGE_KEY.to_string(), token.into());
        }
        store
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<(), CredentialStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CredentialStoreError::Poisoned)?;
        entries.insert(key.to_string(), value.into());
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CredentialStoreError::Poisoned)?;
        Ok(entries.remove(key))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CredentialStoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }
}

/// Store backed by a JSON object on disk, e.g. `{"token": "..."}`.
///
/// The file is re-read on every lookup so tokens written by another process
/// are picked up. A missing file reads as an empty store.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, CredentialStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(CredentialStoreError::Io(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CredentialStoreError::Parse(format!(
                "{}: expected a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(CredentialStoreError::Parse(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Write `key` into the file, creating it if needed.
    pub fn set(&self, key: &str, value: &str) -> Result<(), CredentialStoreError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), Value::String(value.to_string()));

        let raw = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| CredentialStoreError::Parse(e.to_string()))?;
        fs::write(&self.path, raw)
            .map_err(|e| CredentialStoreError::Io(format!("{}: {}", self.path.display(), e)))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        match self.load()?.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(CredentialStoreError::Parse(format!(
                "value for `{}` is not a string: {}",
                key, other
            ))),
        }
    }
}
