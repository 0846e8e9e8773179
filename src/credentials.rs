// Token persistence. The JWT is kept as plaintext in a single file; no
// encryption and no permission changes beyond the filesystem defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to create directory {}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Reads and writes the bearer token at a fixed path.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the token, creating the parent directory first if needed.
    /// Any previous token is overwritten.
    pub fn save(&self, token: &str) -> Result<(), CredentialError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| CredentialError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, token).map_err(|source| CredentialError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Load the stored token. A missing, unreadable or blank file is
    /// reported as `None` so callers can point the user at `--setup`.
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(token) if !token.trim().is_empty() => Some(token),
            Ok(_) => {
                tracing::debug!(path = %self.path.display(), "token file is empty");
                None
            }
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "token not readable");
                None
            }
        }
    }
}
