//! User API handlers
//!
//! Thin wrappers over `UserService`; the guards run inside the service with
//! the identity the middleware attached.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::{InboxResponse, OutboxResponse, UserResponse, UsersResponse};
use crate::application::identity::UserService;
use crate::domain::AuthenticatedUser;
use crate::interfaces::http::common::{ApiResponse, ApiResult};

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users, public fields only", body = ApiResponse<UsersResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    identity: Option<Extension<AuthenticatedUser>>,
) -> ApiResult<UsersResponse> {
    let users = state
        .user_service
        .list_users(identity.as_deref())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ApiResponse::success(UsersResponse { users })))
}

#[utoipa::path(
    get,
    path = "/users/{username}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Own profile", body = ApiResponse<UserResponse>),
        (status = 401, description = "Not this user"),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    identity: Option<Extension<AuthenticatedUser>>,
    Path(username): Path<String>,
) -> ApiResult<UserResponse> {
    let user = state
        .user_service
        .get_profile(identity.as_deref(), &username)
        .await?;

    Ok(Json(ApiResponse::success(UserResponse { user: user.into() })))
}

#[utoipa::path(
    get,
    path = "/users/{username}/to",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Messages received", body = ApiResponse<InboxResponse>),
        (status = 401, description = "Not this user"),
        (status = 404, description = "No messages found")
    )
)]
pub async fn messages_to(
    State(state): State<UserHandlerState>,
    identity: Option<Extension<AuthenticatedUser>>,
    Path(username): Path<String>,
) -> ApiResult<InboxResponse> {
    let messages = state
        .user_service
        .messages_to(identity.as_deref(), &username)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ApiResponse::success(InboxResponse { messages })))
}

#[utoipa::path(
    get,
    path = "/users/{username}/from",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Messages sent", body = ApiResponse<OutboxResponse>),
        (status = 401, description = "Not this user"),
        (status = 404, description = "No messages found")
    )
)]
pub async fn messages_from(
    State(state): State<UserHandlerState>,
    identity: Option<Extension<AuthenticatedUser>>,
    Path(username): Path<String>,
) -> ApiResult<OutboxResponse> {
    let messages = state
        .user_service
        .messages_from(identity.as_deref(), &username)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ApiResponse::success(OutboxResponse { messages })))
}
