use crate::models::{Intent, IntentKind, SchemeRecord, UserProfile};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while classifying or answering a query
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

const UJJWALA_ID: &str = "pradhan_mantri_ujjwala_yojana";
const MATRU_VANDANA_ID: &str = "pradhan_mantri_matru_vandana_yojana";

/// Reply used when no scheme matched
pub const NO_MATCH_REPLY: &str = "नमस्ते बहन! आपके सवाल के लिए धन्यवाद। मुझे कोई ऐसी योजना नहीं मिली जो आपके लिए उपयुक्त हो। क्या आप अपने बारे में थोड़ी और जानकारी दे सकती हैं? जैसे क्या आपके पास आधार कार्ड है, आपकी आय कितनी है, या क्या आप गर्भवती हैं?";

/// Reply used when response generation fails
pub const APOLOGY_REPLY: &str = "नमस्ते बहन! मुझे आपका सवाल समझने में थोड़ी दिक्कत हो रही है। क्या आप अपना सवाल दोबारा पूछ सकती हैं?";

const UJJWALA_REPLY: &str = "नमस्ते बहन! प्रधानमंत्री उज्ज्वला योजना के बारे में पूछने के लिए धन्यवाद। इस योजना के तहत, BPL परिवार की महिलाओं को मुफ्त LPG कनेक्शन मिलता है। आपको बस अपना आधार कार्ड, BPL राशन कार्ड, और बैंक अकाउंट डिटेल्स देने होंगे। क्या आप इसके लिए अप्लाई करना चाहेंगी?";

const MATRU_VANDANA_REPLY: &str = "नमस्ते बहन! प्रधानमंत्री मातृ वंदना योजना पहले बच्चे वाली गर्भवती और स्तनपान कराने वाली माताओं के लिए है। इसमें आपको ₹5,000 की आर्थिक सहायता तीन किस्तों में मिलती है। आपको अपना आधार कार्ड, बैंक अकाउंट, और MCP कार्ड देना होगा। क्या आप इसके बारे में और जानना चाहेंगी?";

const ELIGIBILITY_REPLY: &str = "नमस्ते बहन! आपकी योग्यता जांचने के लिए धन्यवाद। आपके द्वारा दी गई जानकारी के अनुसार, आप इन योजनाओं के लिए योग्य हो सकती हैं। क्या आप इनके बारे में विस्तार से जानना चाहेंगी?";

const GENERAL_REPLY: &str = "नमस्ते बहन! आपके सवाल के लिए धन्यवाद। मैं आपको सरकारी योजनाओं के बारे में बताने में मदद कर सकती हूँ। क्या आप किसी विशेष योजना के बारे में जानना चाहती हैं, या मैं आपको कुछ लोकप्रिय योजनाओं के बारे में बताऊं?";

/// Intent classification and reply generation collaborator
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Classify a transcribed query and extract a user profile from it
    async fn classify(&self, text: &str) -> Result<Intent, AssistantError>;

    /// Produce a spoken reply for the intent and the matched schemes
    async fn respond(&self, intent: &Intent, schemes: &[SchemeRecord]) -> Result<String, AssistantError>;
}

/// Deterministic keyword-based assistant
#[derive(Debug, Clone, Default)]
pub struct KeywordAssistant;

impl KeywordAssistant {
    pub fn new() -> Self {
        Self
    }

    fn classify_text(text: &str) -> Intent {
        let lower = text.to_lowercase();

        if text.contains("उज्ज्वला") || lower.contains("gas") || lower.contains("cylinder") {
            Intent {
                intent: IntentKind::SchemeInfo,
                scheme: Some(UJJWALA_ID.to_string()),
                user_profile: UserProfile::new()
                    .with("has_aadhaar", true)
                    .with("income_level", "bpl")
                    .with("has_lpg_connection", false),
            }
        } else if text.contains("मातृ") || lower.contains("maternity") || lower.contains("pregnancy") {
            Intent {
                intent: IntentKind::EligibilityCheck,
                scheme: Some(MATRU_VANDANA_ID.to_string()),
                user_profile: UserProfile::new()
                    .with("has_aadhaar", true)
                    .with("is_pregnant", true)
                    .with("children_count", 0i64),
            }
        } else {
            Intent {
                intent: IntentKind::GeneralInquiry,
                scheme: None,
                user_profile: UserProfile::new().with("has_aadhaar", true),
            }
        }
    }

    fn reply_for(intent: &Intent, schemes: &[SchemeRecord]) -> &'static str {
        if schemes.is_empty() {
            return NO_MATCH_REPLY;
        }

        match (intent.intent, intent.scheme.as_deref()) {
            (IntentKind::SchemeInfo, Some(UJJWALA_ID)) => UJJWALA_REPLY,
            (IntentKind::SchemeInfo, Some(MATRU_VANDANA_ID)) => MATRU_VANDANA_REPLY,
            (IntentKind::EligibilityCheck, _) => ELIGIBILITY_REPLY,
            _ => GENERAL_REPLY,
        }
    }
}

#[async_trait]
impl Assistant for KeywordAssistant {
    async fn classify(&self, text: &str) -> Result<Intent, AssistantError> {
        tracing::info!("Classifying intent for text: {}", text);
        let intent = Self::classify_text(text);
        tracing::info!("Intent classification result: {:?}", intent.intent);
        Ok(intent)
    }

    async fn respond(&self, intent: &Intent, schemes: &[SchemeRecord]) -> Result<String, AssistantError> {
        tracing::info!("Generating response for intent: {:?}", intent.intent);
        Ok(Self::reply_for(intent, schemes).to_string())
    }
}
