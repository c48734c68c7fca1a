//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::RegisterUserDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 71, message = "password must be 1-71 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
}

impl From<RegisterRequest> for RegisterUserDto {
    fn from(r: RegisterRequest) -> Self {
        Self {
            username: r.username,
            password: r.password,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
        }
    }
}

/// Bearer token for the `Authorization` header.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}
