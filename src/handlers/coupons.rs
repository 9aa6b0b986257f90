use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::ApiError,
    handlers::common::{validate_input, ApiResponse},
    models::{CouponCode, CouponValidationResult, Currency, Location, TicketType, UserType},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ValidateCouponRequest {
    #[validate(length(min = 1))]
    code: String,
    ticket_type: TicketType,
    user_type: UserType,
    location: Location,
    base_amount: i64,
    /// Defaults to the location's billing currency when omitted.
    #[serde(default)]
    currency: Option<Currency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicableQuery {
    ticket_type: TicketType,
    user_type: UserType,
    location: Location,
}

/// POST /api/v1/coupons/validate
///
/// Gate failures come back as `success: true` with `isValid: false` in the
/// data: they are validation outcomes, not transport errors.
async fn validate_coupon(
    State(state): State<AppState>,
    Json(request): Json<ValidateCouponRequest>,
) -> Result<Json<ApiResponse<CouponValidationResult>>, ApiError> {
    validate_input(&request)?;
    let currency = request
        .currency
        .unwrap_or_else(|| request.location.currency());
    let result = state.services.coupons.validate_coupon(
        &request.code,
        request.ticket_type,
        request.user_type,
        request.location,
        request.base_amount,
        currency,
    );
    Ok(ApiResponse::ok(result))
}

/// GET /api/v1/coupons/applicable
async fn applicable_coupons(
    State(state): State<AppState>,
    Query(query): Query<ApplicableQuery>,
) -> Result<Json<ApiResponse<Vec<CouponCode>>>, ApiError> {
    let coupons = state.services.coupons.get_applicable_coupons(
        query.ticket_type,
        query.user_type,
        query.location,
    );
    Ok(ApiResponse::ok(coupons))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/validate", post(validate_coupon))
        .route("/applicable", get(applicable_coupons))
}
