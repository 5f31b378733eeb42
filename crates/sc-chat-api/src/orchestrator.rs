//! Chat pipeline orchestration.
//!
//! Sequences catalog fetch, intent extraction, fact resolution, and
//! response synthesis for one request, and converts upstream failures
//! into the degraded apology. The chat endpoint never surfaces an error
//! body to the end user; the `degraded` marker carries the distinction
//! for callers.

use crate::catalog::CatalogClient;
use crate::error::UpstreamError;
use crate::resolver;
use crate::state::AppState;
use sc_protocol::{DegradeReason, Product};

/// Fixed user-facing reply when an upstream failed.
pub const APOLOGY: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";

/// Result of one chat request.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub degraded: Option<DegradeReason>,
}

impl ChatOutcome {
    fn answered(reply: String) -> Self {
        Self {
            reply,
            degraded: None,
        }
    }

    fn degraded() -> Self {
        Self {
            reply: APOLOGY.to_string(),
            degraded: Some(DegradeReason::UpstreamUnavailable),
        }
    }
}

/// Run the full pipeline for one message.
pub async fn handle(state: &AppState, message: &str) -> ChatOutcome {
    // The catalog fetch and intent extraction have no data dependency —
    // issue them concurrently.
    let (products, intent) = tokio::join!(
        fetch_catalog_with_retry(&state.catalog),
        state.extractor.extract(message),
    );

    let products = match products {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "catalog unavailable, degrading");
            return ChatOutcome::degraded();
        }
    };

    let intent = match intent {
        Ok(intent) => intent,
        Err(e) => {
            tracing::error!(error = %e, "intent extraction unavailable, degrading");
            return ChatOutcome::degraded();
        }
    };

    tracing::debug!(
        goal = ?intent.goal,
        entity = ?intent.entity,
        tier = state.extractor.tier_name(),
        "intent extracted"
    );

    let facts = resolver::resolve(&intent, &products);
    tracing::debug!(matches = facts.len(), "facts resolved");

    match state.synthesizer.synthesize(message, &facts).await {
        Ok(reply) => ChatOutcome::answered(reply),
        Err(e) => {
            tracing::error!(error = %e, "synthesis unavailable, degrading");
            ChatOutcome::degraded()
        }
    }
}

/// One bounded retry on the catalog fetch before declaring it unavailable.
async fn fetch_catalog_with_retry(
    catalog: &CatalogClient,
) -> Result<Vec<Product>, UpstreamError> {
    match catalog.fetch_all().await {
        Ok(products) => Ok(products),
        Err(first) => {
            tracing::warn!(error = %first, "catalog fetch failed, retrying once");
            catalog.fetch_all().await
        }
    }
}
