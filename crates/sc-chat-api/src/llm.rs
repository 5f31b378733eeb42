//! LLM completion client for the OpenAI-compatible `/chat/completions` API.
//!
//! One HTTP POST per call: model id + system/user messages in, one
//! completion text out. No streaming, no multi-turn state. Both the intent
//! extractor and the response synthesizer go through this client.

use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::UpstreamError;

/// Chat completions request body.
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// A single message in the completion request.
#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Completion response (only fields we need).
#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for the LLM completion upstream.
pub struct LlmClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            api_url: config.llm_api_url.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        }
    }

    /// Request one completion and return its text, trimmed.
    ///
    /// `Unavailable` when the service is unreachable, times out, or answers
    /// non-2xx; `Malformed` when it answers 2xx with an unusable body.
    /// Callers decide whether `Malformed` degrades or propagates.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", self.api_url);

        let body = CompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "llm request failed");
                UpstreamError::Unavailable(format!("llm request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "llm returned non-2xx");
            return Err(UpstreamError::Unavailable(format!(
                "llm returned status {status}"
            )));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to parse llm response body");
            UpstreamError::Malformed(format!("llm response body: {e}"))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| UpstreamError::Malformed("llm response had no choices".into()))?;

        Ok(content.trim().to_string())
    }
}
