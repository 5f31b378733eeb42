//! Response synthesis — turns a resolved fact set into a conversational
//! answer.
//!
//! The completion prompt embeds the original user message and the fact set
//! rendering, nothing else — the model never sees catalog data wider than
//! the facts.

use std::sync::Arc;

use crate::error::UpstreamError;
use crate::llm::LlmClient;
use sc_protocol::FactSet;

/// System prompt for answer generation.
const SYNTH_PROMPT: &str = r#"You are a product catalog chatbot assistant. Given the user's message and the product data, provide a concise, human-readable response in 1-2 sentences.

- Answer ONLY from the given product data.
- Include the product name, price, rating, and shipping or warranty info when available.
- Do NOT include extra commentary or greetings.
- If no product data is given, politely say that you don't have information on this."#;

/// Sentence substituted for an empty fact set.
const NO_DATA_SENTENCE: &str = "No relevant product data found.";

/// Canned reply when the model answers but the completion is unusable.
/// The chat endpoint must always return a response body.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't put together an answer just now. Please try again.";

/// LLM-backed response synthesizer.
pub struct ResponseSynthesizer {
    llm: Arc<LlmClient>,
}

impl ResponseSynthesizer {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// Generate the final reply text.
    ///
    /// `Err(Unavailable)` when the LLM is unreachable; a malformed or empty
    /// completion falls back to `FALLBACK_REPLY` instead of failing.
    pub async fn synthesize(
        &self,
        message: &str,
        facts: &FactSet,
    ) -> Result<String, UpstreamError> {
        let prompt = build_prompt(message, facts);

        match self.llm.complete(SYNTH_PROMPT, &prompt, 0.5, None).await {
            Ok(text) if !text.is_empty() => Ok(text),
            Ok(_) => {
                tracing::warn!("empty completion from synthesis, using canned reply");
                Ok(FALLBACK_REPLY.to_string())
            }
            Err(UpstreamError::Malformed(reason)) => {
                tracing::warn!(%reason, "malformed completion from synthesis, using canned reply");
                Ok(FALLBACK_REPLY.to_string())
            }
            Err(e) => Err(e),
        }
    }
}

/// Assemble the user-side prompt: original message plus the fact set
/// rendering (or the fixed no-data sentence).
fn build_prompt(message: &str, facts: &FactSet) -> String {
    let data = if facts.is_empty() {
        NO_DATA_SENTENCE.to_string()
    } else {
        facts.to_prompt_json()
    };
    format!("User message: \"{message}\"\n\nProduct data (JSON): {data}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use sc_protocol::{FactField, ProductFacts};
    use serde_json::json;
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn iphone_facts() -> FactSet {
        FactSet {
            entries: vec![ProductFacts {
                product_id: 1,
                name: "iPhone 9".into(),
                facts: BTreeMap::from([
                    (FactField::Price, json!(549.0)),
                    (FactField::Rating, json!(4.69)),
                ]),
            }],
        }
    }

    #[test]
    fn prompt_embeds_message_and_facts() {
        let prompt = build_prompt("What is the price and rating of the iPhone 9?", &iphone_facts());
        assert!(prompt.contains("price and rating of the iPhone 9"));
        assert!(prompt.contains("549"));
        assert!(prompt.contains("4.69"));
    }

    #[test]
    fn prompt_carries_nothing_beyond_the_fact_set() {
        // The product has more attributes in the catalog; only what the
        // resolver selected can reach the model.
        let prompt = build_prompt("tell me about the iPhone 9", &iphone_facts());
        assert!(!prompt.contains("stock"));
        assert!(!prompt.contains("warranty"));
        assert!(!prompt.contains("description"));
    }

    #[test]
    fn empty_fact_set_renders_no_data_sentence() {
        let prompt = build_prompt("price of Nokia 3310?", &FactSet::empty());
        assert!(prompt.contains(NO_DATA_SENTENCE));
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    fn synthesizer_for(server: &MockServer) -> ResponseSynthesizer {
        let mut config = ApiConfig::with_key("test-key");
        config.llm_api_url = server.uri();
        config.upstream_timeout_secs = 2;
        ResponseSynthesizer::new(Arc::new(LlmClient::new(&config)))
    }

    #[tokio::test]
    async fn synthesize_returns_completion_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({"temperature": 0.5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "The iPhone 9 costs $549 and is rated 4.69.",
            )))
            .mount(&server)
            .await;

        let reply = synthesizer_for(&server)
            .synthesize("price and rating of iPhone 9?", &iphone_facts())
            .await
            .unwrap();
        assert!(reply.contains("549"));
        assert!(reply.contains("4.69"));
    }

    #[tokio::test]
    async fn empty_completion_falls_back_to_canned_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   ")))
            .mount(&server)
            .await;

        let reply = synthesizer_for(&server)
            .synthesize("hello", &FactSet::empty())
            .await
            .unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn malformed_completion_falls_back_to_canned_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let reply = synthesizer_for(&server)
            .synthesize("hello", &FactSet::empty())
            .await
            .unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn unreachable_llm_propagates_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = synthesizer_for(&server)
            .synthesize("hello", &FactSet::empty())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Unavailable(_)));
    }
}
