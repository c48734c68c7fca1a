//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` deserializes like `axum::Json<T>` and then runs
//! `validator::Validate::validate()`. Both malformed JSON and failed
//! validation are client input errors and come back as 400 in the standard
//! envelope. A body over the `DefaultBodyLimit` stays a 413.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(ValidationErrors),
}

/// `field: message` pairs joined with `; `, sorted so the output is stable.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    parts.sort();

    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // An over-limit body keeps axum's 413; every other JSON failure is a 400.
            Self::Json(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
            ),
            Self::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {}", rejection.body_text()),
            ),
            Self::Invalid(errors) => (StatusCode::BAD_REQUEST, describe(&errors)),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;

        value.validate().map_err(ValidatedJsonRejection::Invalid)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Note {
        #[validate(length(min = 1, max = 10, message = "must be 1-10 characters"))]
        to: String,
        #[validate(length(min = 1, message = "must not be empty"))]
        body: String,
    }

    async fn handler(ValidatedJson(note): ValidatedJson<Note>) -> String {
        note.to
    }

    async fn post_json(raw: &str) -> Response {
        Router::new()
            .route("/notes", post(handler))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/notes")
                    .header("content-type", "application/json")
                    .body(Body::from(raw.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn error_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        json["error"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let resp = post_json(r#"{"to":"bob","body":"hi"}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_fields_are_ignored() {
        let resp = post_json(r#"{"to":"bob","body":"hi","_token":"x"}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let resp = post_json("{not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_text(resp).await.starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn failed_validation_is_400_with_field_messages() {
        let resp = post_json(r#"{"to":"","body":""}"#).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_text(resp).await,
            "body: must not be empty; to: must be 1-10 characters"
        );
    }

    #[tokio::test]
    async fn body_over_default_limit_is_413() {
        let raw = format!(r#"{{"to":"bob","body":"{}"}}"#, "x".repeat(3 * 1024 * 1024));
        let resp = post_json(&raw).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error_text(resp).await, "Request body too large");
    }
}
