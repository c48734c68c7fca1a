//! HTTP REST API
//!
//! - `middleware`: identity resolution (bearer header, `_token` query or body)
//! - `common`: response envelope, error mapping, validated JSON
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table, OpenAPI document and Swagger UI

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, ApiState};
