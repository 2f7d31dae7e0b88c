// Service exports
pub mod assistant;
pub mod gemini;
pub mod pipeline;
pub mod storage;
pub mod synthesis;
pub mod transcription;

pub use assistant::{Assistant, AssistantError, KeywordAssistant};
pub use gemini::GeminiAssistant;
pub use pipeline::{PipelineError, PipelineOutcome, VoicePipeline};
pub use storage::{AudioStorage, StorageError};
pub use synthesis::{Emotion, PlaceholderSynthesizer, SynthesisError, Synthesizer};
pub use transcription::{PlaceholderTranscriber, TranscriptionError, Transcriber};
