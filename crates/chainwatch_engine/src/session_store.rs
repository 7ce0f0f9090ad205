use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chainwatch_core::{SessionEntry, SessionKey, SessionSnapshot};
use chainwatch_logging::{watch_info, watch_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("session directory missing or not writable: {0}")]
    Directory(String),
    #[error("session file unreadable: {0}")]
    Format(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedSession {
    values: BTreeMap<String, String>,
}

/// String-keyed, session-scoped settings kept in one RON file.
///
/// Every change rewrites the file atomically, so a crash never leaves a
/// half-written session behind.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads whatever the session holds. Missing or corrupt files yield defaults.
    pub fn load(&self) -> SessionSnapshot {
        let session = match self.read() {
            Ok(session) => session,
            Err(err) => {
                watch_warn!("Ignoring session file {:?}: {}", self.path, err);
                PersistedSession::default()
            }
        };
        if !session.values.is_empty() {
            watch_info!(
                "Restored {} session values from {:?}",
                session.values.len(),
                self.path
            );
        }
        SessionSnapshot::from_pairs(
            session
                .values
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )
    }

    pub fn save(&self, entry: SessionEntry) -> Result<(), PersistError> {
        let (mut session, _) = self.read_for_update()?;
        session
            .values
            .insert(entry.key().as_str().to_string(), entry.encode());
        self.write(&session)
    }

    pub fn remove(&self, keys: &[SessionKey]) -> Result<(), PersistError> {
        let (mut session, replaced) = self.read_for_update()?;
        let before = session.values.len();
        for key in keys {
            session.values.remove(key.as_str());
        }
        if session.values.len() == before && !replaced {
            return Ok(());
        }
        self.write(&session)
    }

    /// Starts a new session boundary.
    pub fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Like `read`, but an unreadable file is replaced by an empty session
    /// so later changes still get saved. The flag is true in that case.
    fn read_for_update(&self) -> Result<(PersistedSession, bool), PersistError> {
        match self.read() {
            Ok(session) => Ok((session, false)),
            Err(PersistError::Format(err)) => {
                watch_warn!("Replacing unreadable session file {:?}: {}", self.path, err);
                Ok((PersistedSession::default(), true))
            }
            Err(err) => Err(err),
        }
    }

    fn read(&self) -> Result<PersistedSession, PersistError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(PersistedSession::default());
            }
            Err(err) => return Err(err.into()),
        };
        ron::from_str(&content).map_err(|err| PersistError::Format(err.to_string()))
    }

    fn write(&self, session: &PersistedSession) -> Result<(), PersistError> {
        let content = ron::ser::to_string_pretty(session, ron::ser::PrettyConfig::new())
            .map_err(|err| PersistError::Format(err.to_string()))?;

        let dir = self.directory();
        ensure_dir(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path).map_err(|err| PersistError::Io(err.error))?;
        Ok(())
    }

    fn directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::Directory(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::Directory("path is not a directory".into()));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| PersistError::Directory(e.to_string()))
}
