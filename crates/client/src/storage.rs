//! Secure session token storage.
//!
//! The client only needs `get`, `set` and `remove` over two keys, so the
//! platform keychain (or anything else) plugs in behind [`TokenStore`].
//! Two implementations ship here: [`MemoryTokenStore`] for tests and
//! embedding, and [`FileTokenStore`] for the CLI.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// The two session token slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    /// Short-lived bearer token.
    AccessToken,
    /// Long-lived token exchanged for a new access token.
    RefreshToken,
}

impl TokenKey {
    /// Both keys.
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

    /// Storage key name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "ACCESS_TOKEN",
            Self::RefreshToken => "REFRESH_TOKEN",
        }
    }
}

/// Errors raised by a token store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a token map.
    #[error("corrupt token file {path}: {source}")]
    Corrupt {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value storage for session tokens.
pub trait TokenStore: Send + Sync {
    /// Read a token; `None` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, StoreError>;

    /// Write a token.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set(&self, key: TokenKey, value: SecretString) -> Result<(), StoreError>;

    /// Empty a slot. Removing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn remove(&self, key: TokenKey) -> Result<(), StoreError>;

    /// Empty both slots.
    ///
    /// # Errors
    ///
    /// Returns the first `StoreError` encountered.
    fn clear(&self) -> Result<(), StoreError> {
        for key in TokenKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-process token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<TokenKey, SecretString>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a session.
    #[must_use]
    pub fn with_session(access_token: &str, refresh_token: &str) -> Self {
        let tokens = HashMap::from([
            (TokenKey::AccessToken, SecretString::from(access_token)),
            (TokenKey::RefreshToken, SecretString::from(refresh_token)),
        ]);
        Self {
            tokens: RwLock::new(tokens),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, StoreError> {
        let tokens = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tokens.get(&key).cloned())
    }

    fn set(&self, key: TokenKey, value: SecretString) -> Result<(), StoreError> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
        Ok(())
    }

    fn remove(&self, key: TokenKey) -> Result<(), StoreError> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        Ok(())
    }
}

/// Token store persisted as a JSON map in a file readable only by its owner.
///
/// The file is rewritten through a temporary sibling and renamed into place,
/// and removed entirely once both slots are empty.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Store tokens at `path`. Nothing is touched until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, tokens: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if tokens.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.io_error(e)),
            };
        }

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        let json = serde_json::to_string_pretty(tokens).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // NamedTempFile is created owner-only (0600 on unix) under a random name.
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tokens = self.load()?;
        change(&mut tokens);
        self.save(&tokens)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<SecretString>, StoreError> {
        Ok(self.load()?.remove(key.as_str()).map(SecretString::from))
    }

    fn set(&self, key: TokenKey, value: SecretString) -> Result<(), StoreError> {
        self.update(|tokens| {
            tokens.insert(key.as_str().to_owned(), value.expose_secret().to_owned());
        })
    }

    fn remove(&self, key: TokenKey) -> Result<(), StoreError> {
        self.update(|tokens| {
            tokens.remove(key.as_str());
        })
    }
}
