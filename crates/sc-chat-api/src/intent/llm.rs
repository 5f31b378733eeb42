//! LLM-backed intent extraction.
//!
//! Sends the user message with a strict JSON-only instruction and parses
//! the completion into a typed `Intent`. Missing fields, unexpected goal
//! tags, or an unparseable completion degrade to `Intent::unknown()` —
//! intent extraction errors must not block the user from getting an answer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::IntentExtractor;
use crate::error::UpstreamError;
use crate::llm::LlmClient;
use sc_protocol::{Intent, IntentGoal};

/// System prompt with the goal tag set and the expected JSON output format.
const INTENT_PROMPT: &str = r#"You are an intent and entity extraction assistant for a product catalog chatbot. Parse the user's message into a single JSON object.

The JSON must have exactly these keys: "intent", "entity", "criteria".

- "intent" must be one of:
  "price_query", "availability", "rating_filter", "review_request", "category_query", "general_info", "unknown"
- "entity" is the product or category name the user refers to, or null
- "criteria" is a JSON object with additional filters, or null
  e.g. { "min_rating": 4 }

Examples:

Input: "What's the price of iPhone?"
Output: {"intent": "price_query", "entity": "iPhone", "criteria": null}

Input: "Show me electronics with ratings above 4"
Output: {"intent": "rating_filter", "entity": "electronics", "criteria": {"min_rating": 4}}

Input: "Do you have any laptops?"
Output: {"intent": "availability", "entity": "laptops", "criteria": null}

Input: "Tell me about the Samsung Universe 9"
Output: {"intent": "general_info", "entity": "Samsung Universe 9", "criteria": null}

Respond with ONLY the JSON object (no markdown, no explanation). If the message fits no intent, respond with:
{"intent": "unknown", "entity": null, "criteria": null}"#;

/// Token ceiling for extraction — the answer is a one-line JSON object.
const MAX_TOKENS: u32 = 300;

/// Raw LLM output shape before validation.
#[derive(Debug, Deserialize)]
struct RawIntent {
    intent: Option<String>,
    #[serde(default)]
    entity: serde_json::Value,
    #[serde(default)]
    criteria: serde_json::Value,
}

/// LLM completion intent extractor.
pub struct LlmExtractor {
    llm: Arc<LlmClient>,
}

impl LlmExtractor {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl IntentExtractor for LlmExtractor {
    async fn extract(&self, message: &str) -> Result<Intent, UpstreamError> {
        // Temperature 0 — extraction should be deterministic.
        let completion = match self.llm.complete(INTENT_PROMPT, message, 0.0, Some(MAX_TOKENS)).await
        {
            Ok(text) => text,
            Err(UpstreamError::Malformed(reason)) => {
                tracing::debug!(%reason, "intent completion malformed, degrading to unknown");
                return Ok(Intent::unknown());
            }
            Err(e) => return Err(e),
        };

        match parse_completion(&completion) {
            Some(intent) => Ok(intent),
            None => {
                tracing::debug!(completion = %completion, "no intent JSON in completion");
                Ok(Intent::unknown())
            }
        }
    }

    fn tier_name(&self) -> &str {
        "llm"
    }
}

/// Parse a completion into an `Intent`. Returns None when no JSON object
/// can be recovered from the text.
fn parse_completion(raw_text: &str) -> Option<Intent> {
    let json_str = extract_json(raw_text);
    let raw: RawIntent = serde_json::from_str(json_str).ok()?;
    Some(normalize(raw))
}

/// Validate and normalize the raw shape into the closed `Intent` schema.
fn normalize(raw: RawIntent) -> Intent {
    let goal = raw
        .intent
        .as_deref()
        .map(IntentGoal::from_tag)
        .unwrap_or_default();

    let entity = match raw.entity {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    };

    // Models return "min_rating" as a number or a numeric string; accept both.
    let min_rating = raw
        .criteria
        .get("min_rating")
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

    Intent {
        goal,
        entity,
        min_rating,
    }
}

/// Extract JSON from LLM output that may be wrapped in markdown code blocks.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    // Try ```json ... ``` first
    if let Some(start) = trimmed.find("```json") {
        let after_fence = &trimmed[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    // Try ``` ... ```
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    // Assume raw JSON
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ── extract_json ─────────────────────────────────────────────

    #[test]
    fn extract_json_raw() {
        let input = r#"{"intent": "price_query", "entity": "iPhone", "criteria": null}"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn extract_json_markdown_json_block() {
        let input = "```json\n{\"intent\": \"unknown\"}\n```";
        assert_eq!(extract_json(input), "{\"intent\": \"unknown\"}");
    }

    #[test]
    fn extract_json_with_surrounding_text() {
        let input = "Here you go:\n```json\n{\"intent\": \"availability\"}\n```\nDone.";
        assert_eq!(extract_json(input), "{\"intent\": \"availability\"}");
    }

    // ── parse_completion / normalize ─────────────────────────────

    #[test]
    fn parse_valid_completion() {
        let intent = parse_completion(
            r#"{"intent": "price_query", "entity": "iPhone 9", "criteria": null}"#,
        )
        .unwrap();
        assert_eq!(intent.goal, IntentGoal::PriceQuery);
        assert_eq!(intent.entity.as_deref(), Some("iPhone 9"));
        assert!(intent.min_rating.is_none());
    }

    #[test]
    fn parse_criteria_number_and_numeric_string() {
        let intent = parse_completion(
            r#"{"intent": "rating_filter", "entity": null, "criteria": {"min_rating": 4}}"#,
        )
        .unwrap();
        assert_eq!(intent.min_rating, Some(4.0));

        let intent = parse_completion(
            r#"{"intent": "rating_filter", "entity": null, "criteria": {"min_rating": "4.5"}}"#,
        )
        .unwrap();
        assert_eq!(intent.min_rating, Some(4.5));
    }

    #[test]
    fn unexpected_goal_tag_normalizes_to_unknown() {
        let intent =
            parse_completion(r#"{"intent": "purchase", "entity": "iPhone", "criteria": null}"#)
                .unwrap();
        assert_eq!(intent.goal, IntentGoal::Unknown);
        // Entity survives even when the goal doesn't.
        assert_eq!(intent.entity.as_deref(), Some("iPhone"));
    }

    #[test]
    fn whitespace_entity_normalizes_to_none() {
        let intent =
            parse_completion(r#"{"intent": "price_query", "entity": "   ", "criteria": null}"#)
                .unwrap();
        assert!(intent.entity.is_none());
    }

    #[test]
    fn non_string_entity_normalizes_to_none() {
        let intent =
            parse_completion(r#"{"intent": "price_query", "entity": 42, "criteria": null}"#)
                .unwrap();
        assert!(intent.entity.is_none());
    }

    #[test]
    fn garbage_completion_parses_to_none() {
        assert!(parse_completion("I'd say this is a price question!").is_none());
        assert!(parse_completion("").is_none());
    }

    // ── end-to-end against a mock LLM ────────────────────────────

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    fn extractor_for(server: &MockServer) -> LlmExtractor {
        let mut config = ApiConfig::with_key("test-key");
        config.llm_api_url = server.uri();
        config.upstream_timeout_secs = 2;
        LlmExtractor::new(Arc::new(LlmClient::new(&config)))
    }

    #[tokio::test]
    async fn extract_parses_model_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                r#"{"intent": "availability", "entity": "laptops", "criteria": null}"#,
            )))
            .mount(&server)
            .await;

        let intent = extractor_for(&server).extract("do you have laptops?").await.unwrap();
        assert_eq!(intent.goal, IntentGoal::Availability);
        assert_eq!(intent.entity.as_deref(), Some("laptops"));
    }

    #[tokio::test]
    async fn malformed_completion_degrades_to_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not a completion"))
            .mount(&server)
            .await;

        // Received-but-unusable is a degrade, not an error.
        let intent = extractor_for(&server).extract("hello").await.unwrap();
        assert!(intent.is_unknown());
    }

    #[tokio::test]
    async fn unreachable_llm_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = extractor_for(&server).extract("hello").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Unavailable(_)));
    }
}
