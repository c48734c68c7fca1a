//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::application::identity::UserService;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let auth = state
        .user_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(ApiResponse::success(TokenResponse { token: auth.token })))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Validation error or username taken")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<TokenResponse> {
    let registration = state.user_service.register(request.into()).await?;

    Ok(Json(ApiResponse::success(TokenResponse {
        token: registration.token,
    })))
}
