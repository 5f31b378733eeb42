//! Shared application state for the Axum server.
//!
//! Holds only immutable clients behind `Arc` — requests share nothing
//! mutable, so no locks are needed anywhere in the pipeline.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::ApiConfig;
use crate::intent::{FallbackExtractor, IntentExtractor, LlmExtractor, RuleBasedExtractor};
use crate::llm::LlmClient;
use crate::synth::ResponseSynthesizer;

/// Shared application state, cloned into each Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Product catalog upstream.
    pub catalog: Arc<CatalogClient>,
    /// Intent extraction engine (LLM with rule-based fallback).
    pub extractor: Arc<dyn IntentExtractor>,
    /// Grounded answer generation.
    pub synthesizer: Arc<ResponseSynthesizer>,
}

impl AppState {
    /// Wire up the full pipeline from configuration.
    pub fn from_config(config: &ApiConfig) -> Self {
        let llm = Arc::new(LlmClient::new(config));
        let extractor: Arc<dyn IntentExtractor> = Arc::new(FallbackExtractor::new(
            Box::new(LlmExtractor::new(llm.clone())),
            Box::new(RuleBasedExtractor::new()),
        ));
        Self {
            catalog: Arc::new(CatalogClient::new(config)),
            extractor,
            synthesizer: Arc::new(ResponseSynthesizer::new(llm)),
        }
    }
}
