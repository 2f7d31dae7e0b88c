use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::UserProfile;

/// Request to look up a single scheme
///
/// Identifiers longer than 128 characters are rejected as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SchemeRequest {
    #[validate(length(max = 128))]
    #[serde(alias = "schemeId")]
    pub scheme_id: String,
}

/// Request to match a profile against the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSchemesRequest {
    #[serde(default, alias = "userProfile", alias = "profile")]
    pub user_profile: UserProfile,
}

/// Request to synthesize speech from text
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TextToSpeechRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    #[serde(default)]
    pub emotion: Option<String>,
}
