//! Filesystem image store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use pixpost_core::ports::{ImageStore, ImageStoreError};

/// Image store rooted at a flat uploads directory. Files are named
/// `<id>.<extension>` with no subdirectories.
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the uploads directory if it does not exist yet. Called once
    /// at startup.
    pub async fn ensure_root(&self) -> Result<(), ImageStoreError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ImageStoreError::Io(e.to_string()))
    }

    fn path_for(&self, id: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{id}.{extension}"))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn finalize(
        &self,
        temp_path: &Path,
        id: &str,
        extension: &str,
    ) -> Result<(), ImageStoreError> {
        let target = self.path_for(id, extension);

        if let Err(rename_err) = fs::rename(temp_path, &target).await {
            // The temp dir can live on a different filesystem, where a
            // rename fails with EXDEV; fall back to copy + remove.
            tracing::debug!(
                error = %rename_err,
                "rename failed, copying upload into place"
            );
            fs::copy(temp_path, &target)
                .await
                .map_err(|e| ImageStoreError::Io(e.to_string()))?;
            let _ = fs::remove_file(temp_path).await;
        }

        tracing::debug!(path = %target.display(), "image finalized");
        Ok(())
    }

    async fn delete(&self, id: &str, extension: &str) -> Result<(), ImageStoreError> {
        let target = self.path_for(id, extension);

        match fs::remove_file(&target).await {
            Ok(()) => {
                tracing::info!(path = %target.display(), "image deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %target.display(), "image not found, nothing to delete");
                Ok(())
            }
            Err(e) => Err(ImageStoreError::Io(e.to_string())),
        }
    }

    async fn read(&self, id: &str, extension: &str) -> Result<Option<Vec<u8>>, ImageStoreError> {
        match fs::read(self.path_for(id, extension)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ImageStoreError::Io(e.to_string())),
        }
    }
}
