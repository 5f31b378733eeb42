use serde::{Deserialize, Serialize};

/// Incoming chat request body. One message in, one reply out — every
/// request is independent, there is no session state to carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Why a reply was degraded to the canned apology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeReason {
    /// A required upstream (catalog or LLM) was unreachable or returned
    /// an unusable payload.
    UpstreamUnavailable,
}

/// Outgoing chat response body.
///
/// The endpoint always answers 200 with a reply text, even when an
/// upstream failed; `degraded` is the machine-readable marker that lets a
/// caller tell "we answered" from "upstream failed".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<DegradeReason>,
}

impl ChatResponse {
    pub fn answered(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            degraded: None,
        }
    }

    pub fn degraded(response: impl Into<String>, reason: DegradeReason) -> Self {
        Self {
            response: response.into(),
            degraded: Some(reason),
        }
    }
}
