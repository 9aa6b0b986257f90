use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    errors::ServiceError,
    handlers::common::ApiResponse,
    models::{Location, PackageType, PricingResult, TicketType, UserProfile, UserType},
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingQuery {
    ticket_type: TicketType,
    location: Location,
    user_type: UserType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileQuery {
    location: Location,
    user_type: UserType,
}

/// GET /api/v1/pricing
async fn get_pricing(
    State(state): State<AppState>,
    Query(query): Query<PricingQuery>,
) -> Result<Json<ApiResponse<PricingResult>>, ServiceError> {
    let profile = UserProfile {
        location: query.location,
        user_type: query.user_type,
    };
    let result = state
        .services
        .pricing
        .calculate_pricing(query.ticket_type, profile)?;
    Ok(ApiResponse::ok(result))
}

/// GET /api/v1/pricing/all
async fn get_all_pricing(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ApiResponse<HashMap<TicketType, PricingResult>>>, ServiceError> {
    let profile = UserProfile {
        location: query.location,
        user_type: query.user_type,
    };
    let all = state.services.pricing.get_all_pricing(profile)?;
    Ok(ApiResponse::ok(all))
}

/// GET /api/v1/pricing/packages/{package}
async fn get_package_pricing(
    State(state): State<AppState>,
    Path(package): Path<PackageType>,
) -> Result<Json<ApiResponse<PricingResult>>, ServiceError> {
    let result = state.services.pricing.calculate_package_pricing(package)?;
    Ok(ApiResponse::ok(result))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_pricing))
        .route("/all", get(get_all_pricing))
        .route("/packages/:package", get(get_package_pricing))
}
