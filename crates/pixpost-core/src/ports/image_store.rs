use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Image store errors.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("Image store I/O failed: {0}")]
    Io(String),
}

/// Flat filesystem area holding uploaded images keyed by post id.
///
/// Files are named `<id>.<extension>`; there are no subdirectories and no
/// content verification.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Move an uploaded temporary file to its permanent `<id>.<extension>`
    /// name.
    async fn finalize(
        &self,
        temp_path: &Path,
        id: &str,
        extension: &str,
    ) -> Result<(), ImageStoreError>;

    /// Remove the image if present; a missing file is a logged no-op.
    async fn delete(&self, id: &str, extension: &str) -> Result<(), ImageStoreError>;

    /// Read the image bytes back, `None` when the file does not exist.
    async fn read(&self, id: &str, extension: &str) -> Result<Option<Vec<u8>>, ImageStoreError>;
}
