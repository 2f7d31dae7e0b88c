// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Constraint, Intent, IntentKind, MatchPass, ProfileValue, SchemeRecord, UserProfile, ValueKind};
pub use requests::{MatchSchemesRequest, SchemeRequest, TextToSpeechRequest};
pub use responses::{
    EchoAudioResponse, ErrorResponse, HealthResponse, MatchSchemesResponse, ProcessAudioResponse,
    SchemeResponse, SchemesResponse, TranscriptionResponse,
};
