use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while generating speech
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Speech generation failed: {0}")]
    Generation(String),

    #[error("Failed to write audio: {0}")]
    Io(#[from] std::io::Error),
}

/// Emotional tone for generated speech
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Confused,
    Excited,
    Empathetic,
}

impl Emotion {
    /// Parse a tag, falling back to neutral for unknown tones
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "confused" => Emotion::Confused,
            "excited" => Emotion::Excited,
            "empathetic" => Emotion::Empathetic,
            _ => Emotion::Neutral,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Emotion::Neutral => "neutral",
            Emotion::Confused => "confused",
            Emotion::Excited => "excited",
            Emotion::Empathetic => "empathetic",
        };
        f.write_str(tag)
    }
}

/// Text-to-speech collaborator
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Write speech for `text` to `output_path` and return the written path
    async fn synthesize(
        &self,
        text: &str,
        emotion: Emotion,
        output_path: &Path,
    ) -> Result<PathBuf, SynthesisError>;
}

/// Stand-in synthesizer until a voice model is wired in
///
/// Writes a small placeholder artifact where the audio would go.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderSynthesizer;

impl PlaceholderSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Synthesizer for PlaceholderSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        emotion: Emotion,
        output_path: &Path,
    ) -> Result<PathBuf, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::Generation("no text to speak".to_string()));
        }

        let preview: String = text.chars().take(50).collect();
        tracing::info!("Generating {} speech for text: {}...", emotion, preview);

        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output_path, b"# This is a placeholder for the generated audio").await?;

        tracing::info!("Generated speech saved to {}", output_path.display());
        Ok(output_path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_tags() {
        assert_eq!(Emotion::from_tag("Excited"), Emotion::Excited);
        assert_eq!(Emotion::from_tag("angry"), Emotion::Neutral);
        assert_eq!(Emotion::Empathetic.to_string(), "empathetic");
    }

    #[tokio::test]
    async fn test_placeholder_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reply.mp3");

        let written = PlaceholderSynthesizer::new()
            .synthesize("नमस्ते", Emotion::Neutral, &path)
            .await
            .unwrap();

        assert_eq!(written, path);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_blank_text_is_generation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlaceholderSynthesizer::new()
            .synthesize("   ", Emotion::Neutral, &dir.path().join("x.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Generation(_)));
    }
}
