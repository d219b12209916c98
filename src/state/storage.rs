//! Session persistence
//!
//! The persisted session is a small JSON document holding `token`,
//! `refreshToken` and `user`, the same keys the web client kept in local
//! storage.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use crate::models::User;
use crate::utils::errors::{TicketDeskError, Result};

/// Snapshot of what survives a restart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl PersistedSession {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// Backing store for the session context
pub trait SessionStorage: Send + Sync {
    /// Read the persisted session; `Ok(None)` when nothing is stored
    fn load(&self) -> Result<Option<PersistedSession>>;

    fn save(&self, session: &PersistedSession) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<PersistedSession>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No persisted session found");
                return Ok(None);
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read session file");
                return Err(e.into());
            }
        };

        if data.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<PersistedSession>(&data) {
            Ok(session) => {
                debug!(path = %self.path.display(), has_token = session.token.is_some(), "Session loaded from disk");
                Ok(Some(session))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Session file is corrupt");
                Err(TicketDeskError::Storage(format!("Corrupt session file: {}", e)))
            }
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let serialized = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, serialized)?;
        debug!(path = %self.path.display(), "Session saved to disk");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage, used by tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    inner: Mutex<Option<PersistedSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }

    /// Current stored snapshot, for inspection
    pub fn snapshot(&self) -> Option<PersistedSession> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<PersistedSession>> {
        Ok(self.snapshot())
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        *self.inner.lock().unwrap_or_else(|p| p.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock().unwrap_or_else(|p| p.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use tempfile::TempDir;

    fn sample() -> PersistedSession {
        PersistedSession {
            token: Some("abc".to_string()),
            refresh_token: Some("def".to_string()),
            user: Some(User {
                id: 3,
                first_name: Some("Ana".to_string()),
                last_name: None,
                email: "ana@example.com".to_string(),
                role: UserRole::User,
            }),
        }
    }

    #[test]
    fn test_file_storage_uses_web_keys() {
        let dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested/session.json"));

        assert!(storage.load().unwrap().is_none());
        storage.save(&sample()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(storage.path()).unwrap()).unwrap();
        assert_eq!(raw["token"], "abc");
        assert_eq!(raw["refreshToken"], "def");
        assert_eq!(raw["user"]["email"], "ana@example.com");

        assert_eq!(storage.load().unwrap(), Some(sample()));
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
        storage.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileSessionStorage::new(path);
        assert!(matches!(storage.load(), Err(TicketDeskError::Storage(_))));
    }
}
