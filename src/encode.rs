//! Photo file to base64 adapter.
//!
//! Both native analysis entry points accept image data as text-encoded
//! bytes rather than a file handle, so every captured photo is read back
//! from temporary storage and base64-encoded before analysis.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::capture::CapturedPhoto;
use crate::host::FileStore;

/// Base64 text derived from a captured photo's file contents.
///
/// Ephemeral: consumed immediately by analysis and never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur while encoding a captured photo.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The photo file disappeared or became unreadable between capture and
    /// read (the OS may reclaim temp storage at any time).
    #[error("failed to read photo file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Reads a captured photo and produces its base64 representation.
pub struct ImageEncoder {
    store: Arc<dyn FileStore>,
}

impl ImageEncoder {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    pub async fn encode(&self, photo: &CapturedPhoto) -> Result<EncodedImage, EncodeError> {
        let encoded = self.store.read_as_base64(&photo.path).await?;
        log::debug!(
            "encoded {} ({} base64 chars)",
            photo.path.display(),
            encoded.len()
        );
        Ok(EncodedImage::new(encoded))
    }
}

/// Real file-system collaborator backed by `tokio::fs`.
#[derive(Debug, Default)]
pub struct Base64FileStore;

#[async_trait]
impl FileStore for Base64FileStore {
    async fn read_as_base64(&self, path: &Path) -> Result<String, EncodeError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| EncodeError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(STANDARD.encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_base64_file_store_encodes_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really a jpeg").unwrap();

        let store = Base64FileStore;
        let encoded = store.read_as_base64(file.path()).await.unwrap();
        assert_eq!(encoded, STANDARD.encode(b"not really a jpeg"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("vanished.jpg");

        let store = Base64FileStore;
        let err = store.read_as_base64(&gone).await.unwrap_err();
        assert!(err.to_string().contains("vanished.jpg"));
    }

    #[tokio::test]
    async fn test_encoder_wraps_store_output() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xd8, 0xff]).unwrap();

        let encoder = ImageEncoder::new(Arc::new(Base64FileStore));
        let photo = CapturedPhoto::new(file.path());
        let image = encoder.encode(&photo).await.unwrap();
        assert_eq!(image.as_str(), STANDARD.encode([0xff, 0xd8, 0xff]));
    }
}
