use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::Claims,
    errors::{ApiError, ServiceError},
    handlers::common::{validate_input, ApiResponse},
    models::User,
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    #[validate(length(min = 1))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    token: String,
    user: User,
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&request)?;
    let user = state
        .services
        .auth
        .register(request.name, request.email, &request.password)?;
    let token = state.services.auth.issue_token(&user)?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(SessionResponse { token, user }),
    ))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    validate_input(&request)?;
    let (token, user) = state.services.auth.login(&request.email, &request.password)?;
    Ok(ApiResponse::ok(SessionResponse { token, user }))
}

/// GET /api/v1/auth/me
async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Claims>>, ServiceError> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ServiceError::Unauthorized("missing Authorization header".to_string()))?;
    let claims = state.services.auth.authenticate_bearer(header)?;
    Ok(ApiResponse::ok(claims))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}
