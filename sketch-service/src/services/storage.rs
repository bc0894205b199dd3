use service_core::error::AppError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Single-file sink for the most recent grid image.
///
/// Every write replaces the previous file. Concurrent writers are not
/// serialized; the last one to finish wins.
#[derive(Debug, Clone)]
pub struct GridArtifactStore {
    path: PathBuf,
}

impl GridArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, png: &[u8]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, png).await?;

        tracing::debug!(path = ?self.path, bytes = png.len(), "Grid artifact written");
        Ok(())
    }
}
