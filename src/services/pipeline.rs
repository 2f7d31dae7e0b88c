use crate::core::SchemeMatcher;
use crate::models::{Intent, SchemeRecord};
use crate::services::assistant::{Assistant, APOLOGY_REPLY};
use crate::services::storage::AudioStorage;
use crate::services::synthesis::{Emotion, SynthesisError, Synthesizer};
use crate::services::transcription::{TranscriptionError, Transcriber};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Failures that abort a voice request
///
/// Classification and reply failures degrade instead of failing.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
}

/// Everything produced for one spoken query
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub text: String,
    pub intent: Intent,
    pub schemes: Vec<SchemeRecord>,
    pub response: String,
    pub audio_path: PathBuf,
}

/// Transcribe, classify, match, reply, speak
#[derive(Clone)]
pub struct VoicePipeline {
    transcriber: Arc<dyn Transcriber>,
    assistant: Arc<dyn Assistant>,
    synthesizer: Arc<dyn Synthesizer>,
    matcher: SchemeMatcher,
    storage: AudioStorage,
}

impl VoicePipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        assistant: Arc<dyn Assistant>,
        synthesizer: Arc<dyn Synthesizer>,
        matcher: SchemeMatcher,
        storage: AudioStorage,
    ) -> Self {
        Self {
            transcriber,
            assistant,
            synthesizer,
            matcher,
            storage,
        }
    }

    pub async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        self.transcriber.transcribe(audio_path).await
    }

    /// Speak `text` into a fresh file in the audio directory
    pub async fn speak(&self, text: &str, emotion: Emotion) -> Result<PathBuf, SynthesisError> {
        let output = self.storage.new_reply_path();
        self.synthesizer.synthesize(text, emotion, &output).await
    }

    /// Run the full pipeline for one uploaded recording
    pub async fn process(&self, audio_path: &Path) -> Result<PipelineOutcome, PipelineError> {
        let text = self.transcribe(audio_path).await?;

        let intent = match self.assistant.classify(&text).await {
            Ok(intent) => intent,
            Err(e) => {
                tracing::error!("Error classifying intent: {}", e);
                Intent::error()
            }
        };

        let schemes = self.matcher.match_profile(&intent.user_profile).to_records();

        let response = match self.assistant.respond(&intent, &schemes).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Error generating response: {}", e);
                APOLOGY_REPLY.to_string()
            }
        };

        let audio_path = self.speak(&response, Emotion::Neutral).await?;

        Ok(PipelineOutcome {
            text,
            intent,
            schemes,
            response,
            audio_path,
        })
    }

    /// Transcribe a recording and speak the transcription back
    pub async fn echo(&self, audio_path: &Path) -> Result<(String, PathBuf), PipelineError> {
        let text = self.transcribe(audio_path).await?;
        let reply = self.speak(&text, Emotion::Neutral).await?;
        Ok((text, reply))
    }
}
