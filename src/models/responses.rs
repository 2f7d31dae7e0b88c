use serde::{Deserialize, Serialize};
use crate::models::domain::{Intent, MatchPass, SchemeRecord};

/// Response for the full voice pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessAudioResponse {
    pub text: String,
    pub intent: Intent,
    pub schemes: Vec<SchemeRecord>,
    pub response: String,
    pub audio_url: String,
}

/// Response for the echo pipeline (transcribe, then speak it back)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoAudioResponse {
    pub text: String,
    pub audio_url: String,
}

/// Response for speech-to-text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// Full catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemesResponse {
    pub schemes: Vec<SchemeRecord>,
}

/// Single scheme lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeResponse {
    pub scheme: SchemeRecord,
}

/// Result of matching a profile directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSchemesResponse {
    pub schemes: Vec<SchemeRecord>,
    pub pass: MatchPass,
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub schemes: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
