//! Account connection state, read once at startup and written only by
//! explicit connect/disconnect actions.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Profile URL cannot be empty")]
    EmptyProfileUrl,
}

/// Persisted form. Key names are fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "linkedin_connected", default)]
    connected: bool,
    #[serde(
        rename = "linkedin_profile",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    profile_url: Option<String>,
}

#[derive(Debug)]
pub struct AccountSession {
    path: PathBuf,
    stored: StoredSession,
}

impl AccountSession {
    /// Reads the session file; a missing file means "not connected".
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let stored = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => StoredSession::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, stored })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.stored.connected
    }

    pub fn profile_url(&self) -> Option<&str> {
        self.stored.profile_url.as_deref()
    }

    pub fn connect(&mut self, profile_url: &str) -> Result<(), SessionError> {
        let profile_url = profile_url.trim();
        if profile_url.is_empty() {
            return Err(SessionError::EmptyProfileUrl);
        }

        let stored = StoredSession {
            connected: true,
            profile_url: Some(profile_url.to_string()),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        self.stored = stored;
        info!("Connected account {profile_url}");
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.stored = StoredSession::default();
        info!("Disconnected account");
        Ok(())
    }
}
