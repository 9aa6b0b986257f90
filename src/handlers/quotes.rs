use axum::{extract::State, routing::post, Json, Router};

use crate::{
    errors::ServiceError,
    handlers::common::ApiResponse,
    services::quotes::{Quote, QuoteRequest},
    AppState,
};

/// POST /api/v1/quote
///
/// One atomic quote: price resolution, optional coupon, optional
/// membership discount, composed under the configured stacking policy.
async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<ApiResponse<Quote>>, ServiceError> {
    let quote = state.services.quotes.quote(request).await?;
    Ok(ApiResponse::ok(quote))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_quote))
}
