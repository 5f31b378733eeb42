//! Natural-language intent extraction.
//!
//! Converts a user message ("what's the price of iPhone 9?") into a typed
//! `Intent` with goal, entity, and criteria.
//!
//! Two tiers:
//! - **LLM** (primary): completion request with a strict JSON-only prompt.
//! - **Rule-based** (fallback): regex/keyword patterns for common phrasings,
//!   so the system keeps answering when the LLM misses or is down.

pub mod fallback;
pub mod llm;
pub mod rules;

use async_trait::async_trait;

use crate::error::UpstreamError;
use sc_protocol::Intent;

/// Trait for engines that extract a structured intent from a message.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Extract an intent. A malformed-but-received model output is not an
    /// error — it degrades to `Intent::unknown()`. `Err(Unavailable)` is
    /// reserved for an unreachable upstream.
    async fn extract(&self, message: &str) -> Result<Intent, UpstreamError>;

    /// Name of this extraction tier (for logging).
    fn tier_name(&self) -> &str;
}

pub use fallback::FallbackExtractor;
pub use llm::LlmExtractor;
pub use rules::RuleBasedExtractor;
