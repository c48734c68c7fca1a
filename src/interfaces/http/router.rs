//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::identity::UserService;
use crate::application::messaging::MessageService;
use crate::infrastructure::crypto::jwt::TokenService;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{identity_middleware, IdentityState};
use crate::interfaces::http::modules::{
    auth, health, messages, metrics as metrics_module, request_id, users,
};

/// Everything the handlers need. Each handler extracts its own slice via
/// `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub user_service: Arc<UserService>,
    pub message_service: Arc<MessageService>,
    pub tokens: TokenService,
    pub health: health::HealthState,
}

impl FromRef<ApiState> for auth::AuthHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        auth::AuthHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<ApiState> for users::UserHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        users::UserHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<ApiState> for messages::MessageHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        messages::MessageHandlerState {
            message_service: Arc::clone(&s.message_service),
        }
    }
}

impl FromRef<ApiState> for health::HealthState {
    fn from_ref(s: &ApiState) -> Self {
        s.health.clone()
    }
}

impl FromRef<ApiState> for IdentityState {
    fn from_ref(s: &ApiState) -> Self {
        IdentityState {
            tokens: s.tokens.clone(),
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT bearer token. Also accepted as a `_token` query parameter or JSON body field.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        users::list_users,
        users::get_user,
        users::messages_to,
        users::messages_from,
        messages::get_message,
        messages::create_message,
        messages::mark_read,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::RegisterRequest,
            auth::TokenResponse,
            users::PublicProfileDto,
            users::UserProfileDto,
            users::UsersResponse,
            users::UserResponse,
            users::ReceivedMessageDto,
            users::SentMessageDto,
            users::InboxResponse,
            users::OutboxResponse,
            messages::CreateMessageRequest,
            messages::MessageDto,
            messages::MessageDetailDto,
            messages::ReadReceiptDto,
            messages::MessageDetailResponse,
            messages::CreatedMessageResponse,
            messages::ReadReceiptResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Registration and login (JWT)"),
        (name = "Users", description = "User directory, own profile, inbox and outbox"),
        (name = "Messages", description = "Direct messages between two users"),
    ),
    info(
        title = "Messagely API",
        version = "0.1.0",
        description = "Two-party messaging with token authentication",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is mounted only when a Prometheus recorder handle is given.
pub fn create_api_router(state: ApiState, metrics: Option<PrometheusHandle>) -> Router {
    let identity = IdentityState::from_ref(&state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register));

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/{username}", get(users::get_user))
        .route("/{username}/to", get(users::messages_to))
        .route("/{username}/from", get(users::messages_from));

    let message_routes = Router::new()
        .route("/", post(messages::create_message))
        .route("/{id}", get(messages::get_message))
        .route("/{id}/read", post(messages::mark_read));

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/messages", message_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics_module::prometheus_metrics))
                .with_state(metrics_module::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn_with_state(identity, identity_middleware))
        .layer(middleware::from_fn(metrics_module::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::application::identity::CredentialStore;
    use crate::infrastructure::crypto::password::{MAX_PASSWORD_BYTES, MIN_WORK_FACTOR};
    use crate::infrastructure::storage::InMemoryStorage;

    const SECRET: &str = "router-test-secret";

    fn app() -> Router {
        let storage = Arc::new(InMemoryStorage::new());
        let tokens = TokenService::new(SECRET);
        let credentials =
            Arc::new(CredentialStore::new(storage.clone(), MIN_WORK_FACTOR).unwrap());

        let state = ApiState {
            user_service: Arc::new(UserService::new(
                storage.clone(),
                credentials,
                tokens.clone(),
            )),
            message_service: Arc::new(MessageService::new(storage)),
            tokens,
            health: health::HealthState {
                db: None,
                started_at: Arc::new(Instant::now()),
            },
        };
        create_api_router(state, None)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::post(uri).header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn register(app: &Router, username: &str) -> String {
        let (status, body) = send(
            app,
            post_json(
                "/auth/register",
                None,
                json!({
                    "username": username,
                    "password": "password",
                    "first_name": "Test",
                    "last_name": username,
                    "phone": "+15550000",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = send(&app(), get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn register_then_list_users() {
        let app = app();
        let token = register(&app, "alice").await;

        let claims = TokenService::new(SECRET).verify(&token).unwrap();
        assert_eq!(claims.username, "alice");

        let (status, body) = send(&app, get("/users", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        let users = body["data"]["users"].as_array().unwrap();
        assert_eq!(
            users.iter().filter(|u| u["username"] == "alice").count(),
            1
        );
        assert!(users[0].get("password").is_none());
        assert!(users[0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn list_users_anonymous_is_401() {
        let (status, body) = send(&app(), get("/users", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn login_round_trip() {
        let app = app();
        register(&app, "alice").await;

        let (status, body) = send(
            &app,
            post_json(
                "/auth/login",
                None,
                json!({"username": "alice", "password": "password"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["data"]["token"].as_str().unwrap();
        assert_eq!(TokenService::new(SECRET).verify(token).unwrap().username, "alice");
    }

    #[tokio::test]
    async fn login_failures_share_one_response() {
        let app = app();
        register(&app, "alice").await;

        let wrong = send(
            &app,
            post_json(
                "/auth/login",
                None,
                json!({"username": "alice", "password": "nope"}),
            ),
        )
        .await;
        let unknown = send(
            &app,
            post_json(
                "/auth/login",
                None,
                json!({"username": "nobody", "password": "password"}),
            ),
        )
        .await;

        assert_eq!(wrong.0, StatusCode::BAD_REQUEST);
        assert_eq!(wrong, unknown);
        assert_eq!(wrong.1["error"], "Invalid username or password");
    }

    #[tokio::test]
    async fn duplicate_registration_is_400() {
        let app = app();
        register(&app, "alice").await;
        let (status, _) = send(
            &app,
            post_json(
                "/auth/register",
                None,
                json!({
                    "username": "alice",
                    "password": "other",
                    "first_name": "A",
                    "last_name": "B",
                    "phone": "1",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_input_is_400() {
        let app = app();
        let token = register(&app, "alice").await;

        let bad_json = Request::post("/auth/login")
            .header("content-type", "application/json")
            .body(Body::from("{oops"))
            .unwrap();
        assert_eq!(send(&app, bad_json).await.0, StatusCode::BAD_REQUEST);

        let missing_fields = post_json("/auth/register", None, json!({"username": "bob"}));
        assert_eq!(send(&app, missing_fields).await.0, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, get("/messages/abc", Some(&token))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid message id: abc");
    }

    #[tokio::test]
    async fn profile_only_for_self() {
        let app = app();
        let alice = register(&app, "alice").await;
        let bob = register(&app, "bob").await;

        let (status, body) = send(&app, get("/users/alice", Some(&alice))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["username"], "alice");
        assert!(body["data"]["user"]["join_at"].is_string());

        assert_eq!(
            send(&app, get("/users/alice", Some(&bob))).await.0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            send(&app, get("/users/alice", None)).await.0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn message_lifecycle() {
        let app = app();
        let alice = register(&app, "alice").await;
        let bob = register(&app, "bob").await;

        let (status, body) = send(
            &app,
            post_json(
                "/messages",
                Some(&alice),
                json!({"to_username": "bob", "body": "hi bob"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"]["from_username"], "alice");
        let id = body["data"]["message"]["id"].as_i64().unwrap();

        let (status, body) = send(&app, get(&format!("/messages/{}", id), Some(&bob))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["message"]["read_at"].is_null());
        assert_eq!(body["data"]["message"]["from_user"]["username"], "alice");

        let (status, body) = send(
            &app,
            post_json(&format!("/messages/{}/read", id), Some(&bob), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["message"]["read_at"].is_string());

        let (status, body) = send(
            &app,
            post_json(&format!("/messages/{}/read", id), Some(&alice), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Cannot set this message to read");
    }

    #[tokio::test]
    async fn message_access_rules() {
        let app = app();
        let alice = register(&app, "alice").await;
        register(&app, "bob").await;
        let carol = register(&app, "carol").await;

        let (_, body) = send(
            &app,
            post_json(
                "/messages",
                Some(&alice),
                json!({"to_username": "bob", "body": "private"}),
            ),
        )
        .await;
        let id = body["data"]["message"]["id"].as_i64().unwrap();

        assert_eq!(
            send(&app, get(&format!("/messages/{}", id), Some(&carol))).await.0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            send(&app, get("/messages/9999", Some(&carol))).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            send(&app, get(&format!("/messages/{}", id), None)).await.0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn token_in_body_and_query() {
        let app = app();
        let alice = register(&app, "alice").await;
        register(&app, "bob").await;

        let (status, body) = send(
            &app,
            post_json(
                "/messages",
                None,
                json!({"_token": alice, "to_username": "bob", "body": "via body"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"]["from_username"], "alice");

        let (status, body) = send(&app, get(&format!("/users/alice/from?_token={}", alice), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["messages"][0]["to_user"]["username"], "bob");
    }

    #[tokio::test]
    async fn large_body_token_matches_bearer() {
        let app = app();
        let alice = register(&app, "alice").await;
        register(&app, "bob").await;
        let long_body = "x".repeat(1_500_000);

        let (bearer_status, _) = send(
            &app,
            post_json(
                "/messages",
                Some(&alice),
                json!({"to_username": "bob", "body": long_body}),
            ),
        )
        .await;
        let (body_status, body) = send(
            &app,
            post_json(
                "/messages",
                None,
                json!({"_token": alice, "to_username": "bob", "body": long_body}),
            ),
        )
        .await;

        assert_eq!(bearer_status, StatusCode::OK);
        assert_eq!(body_status, StatusCode::OK);
        assert_eq!(body["data"]["message"]["from_username"], "alice");
    }

    #[tokio::test]
    async fn body_over_limit_is_refused_the_same_way_for_every_token_location() {
        let app = app();
        let alice = register(&app, "alice").await;
        register(&app, "bob").await;
        let huge_body = "x".repeat(3 * 1024 * 1024);

        let (bearer_status, _) = send(
            &app,
            post_json(
                "/messages",
                Some(&alice),
                json!({"to_username": "bob", "body": huge_body}),
            ),
        )
        .await;
        let (body_status, _) = send(
            &app,
            post_json(
                "/messages",
                None,
                json!({"_token": alice, "to_username": "bob", "body": huge_body}),
            ),
        )
        .await;

        assert_eq!(bearer_status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_status, bearer_status);
    }

    #[tokio::test]
    async fn login_rejects_suffix_beyond_longest_password() {
        let app = app();
        let longest = "p".repeat(MAX_PASSWORD_BYTES);
        let (status, _) = send(
            &app,
            post_json(
                "/auth/register",
                None,
                json!({
                    "username": "carol",
                    "password": longest,
                    "first_name": "Carol",
                    "last_name": "C",
                    "phone": "1",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let login = |password: String| {
            post_json(
                "/auth/login",
                None,
                json!({"username": "carol", "password": password}),
            )
        };
        assert_eq!(send(&app, login(longest.clone())).await.0, StatusCode::OK);

        let (status, body) = send(&app, login(format!("{}EXTRA", longest))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid username or password");
    }

    #[tokio::test]
    async fn register_refuses_password_past_bcrypt_limit() {
        let (status, _) = send(
            &app(),
            post_json(
                "/auth/register",
                None,
                json!({
                    "username": "carol",
                    "password": "p".repeat(MAX_PASSWORD_BYTES + 1),
                    "first_name": "Carol",
                    "last_name": "C",
                    "phone": "1",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sender_cannot_be_spoofed() {
        let app = app();
        let alice = register(&app, "alice").await;
        register(&app, "bob").await;

        let (_, body) = send(
            &app,
            post_json(
                "/messages",
                Some(&alice),
                json!({"from_username": "bob", "to_username": "bob", "body": "spoof"}),
            ),
        )
        .await;
        assert_eq!(body["data"]["message"]["from_username"], "alice");
    }

    #[tokio::test]
    async fn empty_inbox_is_404() {
        let app = app();
        let bob = register(&app, "bob").await;
        let (status, body) = send(&app, get("/users/bob/to", Some(&bob))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No messages found");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = send(&app(), get("/api-doc/openapi.json", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/messages/{id}/read").is_some());
    }
}
