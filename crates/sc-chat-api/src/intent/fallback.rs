//! Composite extractor — LLM-first with a deterministic fallback.
//!
//! Tries the primary (LLM) extractor first. If it is unavailable or comes
//! back with `unknown`, the fallback (rule-based) extractor gets a turn.
//! The composed engine therefore never fails a request over intent
//! extraction alone.

use async_trait::async_trait;

use super::IntentExtractor;
use crate::error::UpstreamError;
use sc_protocol::Intent;

/// Composite engine that tries the primary extractor first, then the
/// fallback.
pub struct FallbackExtractor {
    primary: Box<dyn IntentExtractor>,
    fallback: Box<dyn IntentExtractor>,
}

impl FallbackExtractor {
    pub fn new(primary: Box<dyn IntentExtractor>, fallback: Box<dyn IntentExtractor>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl IntentExtractor for FallbackExtractor {
    async fn extract(&self, message: &str) -> Result<Intent, UpstreamError> {
        match self.primary.extract(message).await {
            Ok(intent) if !intent.is_unknown() => Ok(intent),
            Ok(_) => {
                tracing::debug!("primary extractor returned unknown, consulting fallback");
                self.fallback.extract(message).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "primary extractor failed, consulting fallback");
                self.fallback.extract(message).await
            }
        }
    }

    fn tier_name(&self) -> &str {
        "fallback"
    }
}
