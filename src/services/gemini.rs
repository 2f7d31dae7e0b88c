use crate::models::{Intent, IntentKind, SchemeRecord, UserProfile};
use crate::services::assistant::{Assistant, AssistantError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Gemini `generateContent` client
///
/// Handles both halves of the assistant contract:
/// - Classifying a query into an intent with an extracted profile
/// - Writing a warm Hinglish reply about the matched schemes
pub struct GeminiAssistant {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

/// Intent as returned by the model, before normalization
#[derive(Debug, Deserialize)]
struct RawIntent {
    intent: String,
    #[serde(default)]
    scheme: Option<String>,
    #[serde(default)]
    user_profile: UserProfile,
}

impl GeminiAssistant {
    /// Create a new Gemini client
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            client,
        })
    }

    /// Send a single-turn prompt and return the first candidate's text
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        tracing::debug!("Calling Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AssistantError::ApiError(format!(
                "generateContent failed: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;

        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(|t| t.as_str())
            .map(|t| t.trim().to_string())
            .ok_or_else(|| AssistantError::InvalidResponse("Missing candidate text".into()))
    }
}

/// Remove a surrounding markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_intent(text: &str) -> Result<Intent, AssistantError> {
    let raw: RawIntent = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| AssistantError::InvalidResponse(format!("Intent is not valid JSON: {}", e)))?;

    Ok(Intent {
        intent: IntentKind::parse(&raw.intent),
        scheme: raw.scheme.filter(|s| !s.trim().is_empty()),
        user_profile: raw.user_profile,
    })
}

fn classification_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following query in Hinglish or Hindi and extract the following information:
1. Primary intent (scheme_info, eligibility_check, application_process, document_requirements, other)
2. Specific scheme id mentioned (if any)
3. User profile information (has_aadhaar, income_level, children_count, is_pregnant, has_lpg_connection, etc.)

Query: {}

Respond only with JSON of the form {{"intent": "...", "scheme": "..." or null, "user_profile": {{...}}}}."#,
        text
    )
}

fn response_prompt(intent: &Intent, schemes: &[SchemeRecord]) -> String {
    let intent_json = serde_json::to_string(intent).unwrap_or_default();
    let schemes_json = serde_json::to_string(schemes).unwrap_or_default();
    format!(
        r#"You are 'Data Didi', a friendly AI assistant helping rural women in India understand government schemes.
Respond to the user's query in a warm, empathetic tone using simple Hinglish (mix of Hindi and English).

User's intent: {}

Matched schemes: {}

Generate a helpful, conversational response that explains the schemes in simple terms.
Avoid complex terminology.
If no schemes match, suggest checking eligibility for popular schemes."#,
        intent_json, schemes_json
    )
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn classify(&self, text: &str) -> Result<Intent, AssistantError> {
        tracing::info!("Classifying intent with Gemini for text: {}", text);
        let reply = self.generate(&classification_prompt(text)).await?;
        parse_intent(&reply)
    }

    async fn respond(&self, intent: &Intent, schemes: &[SchemeRecord]) -> Result<String, AssistantError> {
        tracing::info!("Generating Gemini response for intent: {:?}", intent.intent);
        let reply = self.generate(&response_prompt(intent, schemes)).await?;
        if reply.is_empty() {
            return Err(AssistantError::InvalidResponse("Empty reply".into()));
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn candidate_body(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    fn assistant_for(server: &mockito::ServerGuard) -> GeminiAssistant {
        GeminiAssistant::new(server.url(), "test-key".to_string(), "gemini-pro".to_string(), 5).unwrap()
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_intent_normalizes_fields() {
        let intent = parse_intent(
            r#"{"intent": "Eligibility_Check", "scheme": "", "user_profile": {"is_pregnant": true, "children_count": null}}"#,
        )
        .unwrap();

        assert_eq!(intent.intent, IntentKind::EligibilityCheck);
        assert_eq!(intent.scheme, None);
        assert!(intent.user_profile.asserts("is_pregnant"));
        assert_eq!(intent.user_profile.len(), 2);
        assert_eq!(intent.user_profile.lookup("children_count"), Some(None));
    }

    #[test]
    fn test_parse_intent_rejects_prose() {
        assert!(matches!(
            parse_intent("I think the user wants gas"),
            Err(AssistantError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_calls_generate_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body(
                "```json\n{\"intent\": \"scheme_info\", \"scheme\": \"ayushman_bharat\", \"user_profile\": {\"income_level\": \"low\"}}\n```",
            ))
            .create_async()
            .await;

        let intent = assistant_for(&server).classify("health card").await.unwrap();

        mock.assert_async().await;
        assert_eq!(intent.intent, IntentKind::SchemeInfo);
        assert_eq!(intent.scheme.as_deref(), Some("ayushman_bharat"));
        assert_eq!(intent.user_profile.get("income_level"), Some(&"low".into()));
    }

    #[tokio::test]
    async fn test_respond_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = assistant_for(&server)
            .respond(&Intent::error(), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_respond_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(candidate_body("  नमस्ते बहन!  "))
            .create_async()
            .await;

        let reply = assistant_for(&server).respond(&Intent::error(), &[]).await.unwrap();
        assert_eq!(reply, "नमस्ते बहन!");
    }
}
