//! Identity resolver middleware for Axum
//!
//! Looks for a token in three places, in order: the `Authorization: Bearer`
//! header, a `_token` query parameter, and a `_token` field of a JSON body.
//! The first location that carries a token is the only one consulted. A
//! token that verifies attaches an `AuthenticatedUser` extension; anything
//! else leaves the request anonymous and lets the route guard decide.
//!
//! A JSON body is only inspected when its length is known and within
//! `MAX_INSPECTED_BODY`. Larger or unsized bodies are forwarded untouched;
//! body size limits belong to the extractors downstream.

use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body, Bytes, HttpBody},
    extract::{Query, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::application::identity::resolve_identity;
use crate::infrastructure::crypto::jwt::TokenService;

/// Field name for the query parameter and JSON body token locations.
pub const TOKEN_FIELD: &str = "_token";

/// Upper bound on a JSON body buffered while looking for `_token`. Same as
/// axum's default `DefaultBodyLimit`.
const MAX_INSPECTED_BODY: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct IdentityState {
    pub tokens: TokenService,
}

fn bearer_token(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

fn query_token(request: &Request<Body>) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(request.uri()).ok()?;
    params.get(TOKEN_FIELD).cloned()
}

fn is_json(request: &Request<Body>) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Declared body length: `Content-Length`, else an exact size hint.
fn body_length(request: &Request<Body>) -> Option<u64> {
    request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .or_else(|| request.body().size_hint().exact())
}

fn is_inspectable(request: &Request<Body>) -> bool {
    is_json(request)
        && body_length(request).is_some_and(|len| len <= MAX_INSPECTED_BODY as u64)
}

fn body_token(bytes: &Bytes) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    value.get(TOKEN_FIELD)?.as_str().map(String::from)
}

/// Resolve the request identity. Never rejects the request.
pub async fn identity_middleware(
    State(state): State<IdentityState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut token = bearer_token(&request).or_else(|| query_token(&request));

    let mut request = if token.is_none() && is_inspectable(&request) {
        let (parts, body) = request.into_parts();
        let bytes = match to_bytes(body, MAX_INSPECTED_BODY).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(error = %e, "Request body could not be read for token lookup");
                Bytes::new()
            }
        };
        token = body_token(&bytes);
        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    if let Some(user) = resolve_identity(token.as_deref(), &state.tokens) {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}
