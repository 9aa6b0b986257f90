use axum::{extract::State, routing::post, Json, Router};

use crate::{
    errors::ServiceError,
    handlers::common::ApiResponse,
    services::membership::{MembershipLookup, MembershipVerification},
    AppState,
};

/// POST /api/v1/membership/verify
///
/// Mock IEEE membership check. An empty lookup simply comes back as
/// non-member, matching the upstream mock.
async fn verify_membership(
    State(state): State<AppState>,
    Json(lookup): Json<MembershipLookup>,
) -> Result<Json<ApiResponse<MembershipVerification>>, ServiceError> {
    let verification = state.services.membership.verify(lookup).await;
    Ok(ApiResponse::ok(verification))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/verify", post(verify_membership))
}
