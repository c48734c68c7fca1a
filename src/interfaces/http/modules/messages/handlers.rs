//! Message API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::{
    CreateMessageRequest, CreatedMessageResponse, MessageDetailResponse, ReadReceiptResponse,
};
use crate::application::messaging::MessageService;
use crate::domain::AuthenticatedUser;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct MessageHandlerState {
    pub message_service: Arc<MessageService>,
}

/// Message ids are integers; anything else is a malformed request.
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid message id: {}", raw)))
}

#[utoipa::path(
    get,
    path = "/messages/{id}",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message with both participants", body = ApiResponse<MessageDetailResponse>),
        (status = 400, description = "Invalid message id"),
        (status = 401, description = "Not a participant"),
        (status = 404, description = "No such message")
    )
)]
pub async fn get_message(
    State(state): State<MessageHandlerState>,
    identity: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<String>,
) -> ApiResult<MessageDetailResponse> {
    let id = parse_id(&id)?;
    let message = state
        .message_service
        .get_message(identity.as_deref(), id)
        .await?;

    Ok(Json(ApiResponse::success(MessageDetailResponse {
        message: message.into(),
    })))
}

#[utoipa::path(
    post,
    path = "/messages",
    tag = "Messages",
    security(("bearer_auth" = [])),
    request_body = CreateMessageRequest,
    responses(
        (status = 200, description = "Message sent", body = ApiResponse<CreatedMessageResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Recipient does not exist")
    )
)]
pub async fn create_message(
    State(state): State<MessageHandlerState>,
    identity: Option<Extension<AuthenticatedUser>>,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> ApiResult<CreatedMessageResponse> {
    let message = state
        .message_service
        .create_message(identity.as_deref(), &request.to_username, &request.body)
        .await?;

    Ok(Json(ApiResponse::success(CreatedMessageResponse {
        message: message.into(),
    })))
}

#[utoipa::path(
    post,
    path = "/messages/{id}/read",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Marked read", body = ApiResponse<ReadReceiptResponse>),
        (status = 400, description = "Invalid message id"),
        (status = 401, description = "Not the recipient"),
        (status = 404, description = "No such message")
    )
)]
pub async fn mark_read(
    State(state): State<MessageHandlerState>,
    identity: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<String>,
) -> ApiResult<ReadReceiptResponse> {
    let id = parse_id(&id)?;
    let receipt = state
        .message_service
        .mark_read(identity.as_deref(), id)
        .await?;

    Ok(Json(ApiResponse::success(ReadReceiptResponse {
        message: receipt.into(),
    })))
}
