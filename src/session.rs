//! Signed-in session, persisted between runs.
//!
//! The store is an ordinary value handed to whoever needs it. Only `load`,
//! `set` and `clear` change it.

use crate::error::Result;
use crate::models::{Role, User};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Token and account of the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }
}

/// File-backed holder of the current [`Session`]
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: Option<Session>,
}

impl SessionStore {
    /// A store at `path`, signed out until [`SessionStore::load`] runs
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    /// Restore the persisted session. A missing file means signed out.
    pub async fn load(&mut self) -> Result<Option<&Session>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let session: Session = serde_json::from_str(&raw)?;
                debug!("Restored session for user {}", session.user.id);
                self.current = Some(session);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session at {}", self.path.display());
                self.current = None;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(self.current.as_ref())
    }

    /// Persist and adopt a new session (login, registration, profile update)
    pub async fn set(&mut self, session: Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&session)?;
        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, json.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        info!("Signed in as {} ({})", session.user.email, session.user.role);
        self.current = Some(session);
        Ok(())
    }

    /// Replace the stored user, keeping the token
    pub async fn replace_user(&mut self, user: User) -> Result<()> {
        match self.current.clone() {
            Some(session) => self.set(Session { user, ..session }).await,
            None => Ok(()),
        }
    }

    /// Forget the session (logout)
    pub async fn clear(&mut self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if self.current.take().is_some() {
            info!("Signed out");
        }
        Ok(())
    }
}

/// Write `contents` to a fresh file readable only by its owner (0600 on
/// unix). A leftover file at `path` is removed first so the mode always
/// applies.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    Ok(())
}
