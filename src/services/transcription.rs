use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while transcribing audio
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Audio file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Failed to read audio: {0}")]
    Io(#[from] std::io::Error),
}

/// Speech-to-text collaborator
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError>;

    /// Language code of the spoken audio
    async fn detect_language(&self, _audio_path: &Path) -> String {
        "hi".to_string()
    }
}

/// Stand-in transcriber until a speech model is wired in
///
/// Validates the audio file and returns a canned query keyed by the file name.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderTranscriber;

impl PlaceholderTranscriber {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transcriber for PlaceholderTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        tracing::info!("Transcribing audio file: {}", audio_path.display());

        let metadata = match tokio::fs::metadata(audio_path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TranscriptionError::NotFound(audio_path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.len() == 0 {
            return Err(TranscriptionError::Decode("audio file is empty".to_string()));
        }

        let name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let text = if name.contains("ujjwala") {
            "मुझे उज्ज्वला योजना के बारे में जानकारी चाहिए"
        } else if name.contains("maternity") || name.contains("matru") {
            "प्रधानमंत्री मातृ वंदना योजना क्या है?"
        } else {
            "मुझे सरकारी योजनाओं के बारे में बताएं"
        };

        tracing::info!("Transcribed text: {}", text);
        Ok(text.to_string())
    }
}
