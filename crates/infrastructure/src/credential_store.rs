use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hvacdesk_application::CredentialStore;
use hvacdesk_core::{AppError, AppResult, Credential};
use tokio::sync::RwLock;
use tracing::debug;

/// Credential store persisting one credential as a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store backed by `path`; the file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> AppResult<Option<Credential>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read credential file '{}': {error}",
                    self.path.display()
                )));
            }
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&contents).map(Some).map_err(|error| {
            AppError::Internal(format!(
                "failed to parse credential file '{}': {error}",
                self.path.display()
            ))
        })
    }

    async fn save(&self, credential: &Credential) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create credential directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(credential).map_err(|error| {
            AppError::Internal(format!("failed to serialize credential: {error}"))
        })?;
        tokio::fs::write(&self.path, contents).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write credential file '{}': {error}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove credential file '{}': {error}",
                self.path.display()
            ))),
        }
    }
}

/// Credential store kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> AppResult<Option<Credential>> {
        Ok(self.credential.read().await.clone())
    }

    async fn save(&self, credential: &Credential) -> AppResult<()> {
        *self.credential.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.credential.write().await = None;
        Ok(())
    }
}
