use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::Session;
use crate::options::{Options, Settings};
use crate::stroke::Mark;

/// Errors that can occur during session persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize session: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write session: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read session file: {0}")]
    ReadError(String),
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// The saved form of a session, and the payload of `LOADED`.
///
/// Marks are stored as points only; their paths are derived again on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    pub marks: Vec<Mark>,
    pub options: Options,
    pub settings: Settings,
    /// Seconds since the UNIX epoch when the snapshot was taken
    pub timestamp: u64,
    /// Version of the application that wrote the snapshot
    pub version: String,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            marks: Vec::new(),
            options: Options::default(),
            settings: Settings::default(),
            timestamp: 0,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl SessionSnapshot {
    /// Capture the committed marks, options and settings of a session
    pub fn capture(session: &Session) -> Self {
        Self {
            marks: session.marks().to_vec(),
            options: *session.options(),
            settings: *session.settings(),
            timestamp: unix_now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Snapshot version {} differs from current version {}",
                snapshot.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        Ok(snapshot)
    }

    /// Write the snapshot as JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> PersistenceResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_json()?)?;
        log::debug!("Saved {} marks to {}", self.marks.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> PersistenceResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| PersistenceError::ReadError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}
