use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur with temporary audio storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload exceeds maximum size: {size} bytes (limit: {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("Upload is empty")]
    EmptyUpload,

    #[error("Invalid audio file name: {0}")]
    InvalidFileName(String),

    #[error("Audio file not found: {0}")]
    NotFound(String),
}

/// Temporary storage for uploaded queries and generated replies
#[derive(Debug, Clone)]
pub struct AudioStorage {
    upload_dir: PathBuf,
    audio_dir: PathBuf,
    max_upload_bytes: usize,
}

impl AudioStorage {
    pub fn new(upload_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>, max_upload_bytes: usize) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            audio_dir: audio_dir.into(),
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Create both directories if they don't exist
    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.audio_dir).await?;
        Ok(())
    }

    /// Reject uploads past the size limit before buffering more
    pub fn check_size(&self, size: usize) -> Result<(), StorageError> {
        if size > self.max_upload_bytes {
            return Err(StorageError::TooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }
        Ok(())
    }

    /// Store an uploaded recording under a fresh name
    pub async fn save_upload(&self, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        if bytes.is_empty() {
            return Err(StorageError::EmptyUpload);
        }
        self.check_size(bytes.len())?;

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let path = self.upload_dir.join(format!("{}.wav", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Saved {} byte upload to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Fresh path for a generated reply
    pub fn new_reply_path(&self) -> PathBuf {
        self.audio_dir.join(format!("{}.mp3", Uuid::new_v4()))
    }

    /// Public URL for a file in the audio directory
    pub fn audio_url(path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("/audio/{}", name)
    }

    /// Resolve a requested file name inside the audio directory
    ///
    /// Names containing path separators or parent references are rejected.
    pub async fn resolve_audio(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(StorageError::InvalidFileName(filename.to_string()));
        }

        let path = self.audio_dir.join(filename);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(StorageError::NotFound(filename.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a temporary file, ignoring files that are already gone
    pub async fn discard(path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!("Removed temporary file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_in(dir: &Path) -> AudioStorage {
        AudioStorage::new(dir.join("uploads"), dir.join("audio"), 16)
    }

    #[tokio::test]
    async fn test_save_upload_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());

        let path = storage.save_upload(b"RIFFdata").await.unwrap();
        assert!(path.starts_with(dir.path().join("uploads")));
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFFdata");

        AudioStorage::discard(&path).await;
        assert!(!path.exists());
        // Second discard is a no-op
        AudioStorage::discard(&path).await;
    }

    #[tokio::test]
    async fn test_upload_limits() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());

        assert!(matches!(storage.save_upload(b"").await, Err(StorageError::EmptyUpload)));
        assert!(matches!(
            storage.save_upload(&[0u8; 17]).await,
            Err(StorageError::TooLarge { size: 17, limit: 16 })
        ));
    }

    #[tokio::test]
    async fn test_resolve_audio() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path());
        storage.ensure_dirs().await.unwrap();
        std::fs::write(dir.path().join("audio").join("reply.mp3"), b"mp3").unwrap();

        assert!(storage.resolve_audio("reply.mp3").await.is_ok());
        assert!(matches!(
            storage.resolve_audio("other.mp3").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.resolve_audio("../secret").await,
            Err(StorageError::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_audio_url() {
        let url = AudioStorage::audio_url(Path::new("temp_audio/abc.mp3"));
        assert_eq!(url, "/audio/abc.mp3");
    }
}
