//! Product catalog client.
//!
//! Read-only: one GET for the full product list per chat request. No
//! cross-request caching; every request works from a fresh snapshot.

use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::UpstreamError;
use sc_protocol::Product;

/// How many products to request per fetch. The upstream defaults to a
/// smaller page without an explicit limit.
const FETCH_LIMIT: u32 = 100;

/// Catalog list response envelope.
#[derive(Deserialize)]
struct ProductListResponse {
    #[serde(default)]
    products: Vec<Product>,
}

/// Client for the product catalog upstream.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            base_url: config.catalog_base_url.clone(),
        }
    }

    /// Fetch the full product list. Idempotent; no retry here — retry
    /// policy belongs to the orchestrator.
    pub async fn fetch_all(&self) -> Result<Vec<Product>, UpstreamError> {
        let url = format!("{}/products?limit={FETCH_LIMIT}", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(error = %e, "catalog request failed");
            UpstreamError::Unavailable(format!("catalog request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "catalog returned non-2xx");
            return Err(UpstreamError::Unavailable(format!(
                "catalog returned status {status}"
            )));
        }

        let list: ProductListResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to parse catalog response body");
            UpstreamError::Malformed(format!("catalog response body: {e}"))
        })?;

        tracing::debug!(count = list.products.len(), "catalog fetched");
        Ok(list.products)
    }
}
