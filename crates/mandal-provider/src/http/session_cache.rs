//! On-disk session cache.
//!
//! Keeps the provider session JSON in a file so a new process can
//! resume it. Corrupt or missing cache files read as "no session".

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use mandal_core::types::auth::ProviderSession;
use mandal_core::{AppError, AppResult};

/// Persists the last provider session across process restarts.
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    /// Cache backed by the given file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the cached session, if any.
    pub async fn load(&self) -> Option<ProviderSession> {
        let bytes = fs::read(&self.path).await.ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session cache");
                None
            }
        }
    }

    /// Persist a session.
    pub async fn store(&self, session: &ProviderSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    mandal_core::ErrorKind::Internal,
                    format!("Failed to create session cache directory: {e}"),
                    e,
                )
            })?;
        }
        let json = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, json).await.map_err(|e| {
            AppError::with_source(
                mandal_core::ErrorKind::Internal,
                format!("Failed to write session cache: {e}"),
                e,
            )
        })
    }

    /// Drop the cached session.
    pub async fn clear(&self) {
        let _ = fs::remove_file(&self.path).await;
    }
}
