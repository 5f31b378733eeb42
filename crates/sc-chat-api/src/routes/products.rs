//! Product catalog passthrough endpoint.

use axum::Json;
use axum::extract::State;

use crate::error::ApiResult;
use crate::state::AppState;
use sc_protocol::Product;

/// GET /api/products/ — the full product list.
///
/// Unlike the chat endpoint, this route cannot degrade: an upstream
/// failure surfaces as 502.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.catalog.fetch_all().await?;
    Ok(Json(products))
}
