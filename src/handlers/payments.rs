use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::{
    errors::{ApiError, ServiceError},
    handlers::common::{validate_input, ApiResponse},
    models::{Location, PaymentIntent, PaymentProvider, PricingResult, TicketType, UserType},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateIntentRequest {
    provider: PaymentProvider,
    ticket_type: TicketType,
    location: Location,
    user_type: UserType,
    #[serde(default)]
    coupon_code: Option<String>,
    #[serde(default)]
    #[validate(email)]
    email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIntentResponse {
    intent: PaymentIntent,
    pricing: PricingResult,
    /// Whole currency units actually charged, after any coupon.
    amount_charged: i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct VerifySignatureRequest {
    #[validate(length(min = 1))]
    order_id: String,
    #[validate(length(min = 1))]
    payment_id: String,
    #[validate(length(min = 1))]
    signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifySignatureResponse {
    verified: bool,
}

/// POST /api/v1/payments/intent
///
/// Re-resolves pricing server-side and re-validates the coupon against
/// the resolved amount, so the charge can never trust a client-supplied
/// price. A successful coupon is redeemed here, inside the same flow that
/// charges for it.
async fn create_intent(
    State(state): State<AppState>,
    Json(request): Json<CreateIntentRequest>,
) -> Result<Json<ApiResponse<CreateIntentResponse>>, ApiError> {
    validate_input(&request)?;
    let profile = crate::models::UserProfile {
        location: request.location,
        user_type: request.user_type,
    };
    let pricing = state
        .services
        .pricing
        .calculate_pricing(request.ticket_type, profile)?;
    let mut amount = pricing.final_price;

    if let Some(code) = &request.coupon_code {
        let result = state.services.coupons.validate_coupon(
            code,
            request.ticket_type,
            request.user_type,
            request.location,
            amount,
            pricing.currency,
        );
        if !result.is_valid {
            let reason = result
                .error
                .unwrap_or_else(|| "Invalid coupon code".to_string());
            return Err(ServiceError::BadRequest(reason).into());
        }
        amount = state.services.coupons.apply_coupon_discount(amount, &result);
    }

    let metadata = json!({
        "ticketType": request.ticket_type,
        "location": request.location,
        "userType": request.user_type,
        "couponCode": &request.coupon_code,
        "email": &request.email,
    });
    let intent = state
        .services
        .payments
        .create_intent(request.provider, amount, pricing.currency, metadata)?;

    // A redemption counts only once an intent exists for it; a request
    // that fails earlier must leave the usage count untouched.
    if let Some(code) = &request.coupon_code {
        state.services.coupons.redeem(code)?;
    }
    info!(provider = %request.provider, intent_id = %intent.intent_id, amount, "payment intent created");

    Ok(ApiResponse::ok(CreateIntentResponse {
        intent,
        pricing,
        amount_charged: amount,
    }))
}

/// POST /api/v1/payments/razorpay/verify
async fn verify_razorpay(
    State(state): State<AppState>,
    Json(request): Json<VerifySignatureRequest>,
) -> Result<Json<ApiResponse<VerifySignatureResponse>>, ApiError> {
    validate_input(&request)?;
    let verified = state.services.payments.verify_razorpay_signature(
        &request.order_id,
        &request.payment_id,
        &request.signature,
    )?;
    if !verified {
        return Err(ServiceError::PaymentFailed("Invalid payment signature".to_string()).into());
    }
    Ok(ApiResponse::ok(VerifySignatureResponse { verified }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/intent", post(create_intent))
        .route("/razorpay/verify", post(verify_razorpay))
}
