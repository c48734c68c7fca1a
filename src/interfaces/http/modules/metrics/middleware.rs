//! Per-request HTTP metrics
//!
//! | metric                          | kind      | labels                          |
//! |---------------------------------|-----------|---------------------------------|
//! | `http_requests_total`           | counter   | `method`, `route`, `status`     |
//! | `http_request_duration_seconds` | histogram | `method`, `route`               |
//! | `http_client_errors_total`      | counter   | `route`, `status` (4xx only)    |
//!
//! `route` is the matched template (`/messages/{id}`), never the raw path, so
//! usernames and message ids do not become label values. Requests that match
//! no route share the `unmatched` label.

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

const UNMATCHED: &str = "unmatched";

struct RouteLabels {
    method: String,
    route: String,
}

impl RouteLabels {
    fn of(request: &Request<Body>) -> Self {
        Self {
            method: request.method().as_str().to_owned(),
            route: request
                .extensions()
                .get::<MatchedPath>()
                .map_or_else(|| UNMATCHED.to_owned(), |m| m.as_str().to_owned()),
        }
    }

    fn record(self, status: StatusCode, seconds: f64) {
        let code = status.as_u16().to_string();

        if status.is_client_error() {
            metrics::counter!("http_client_errors_total", "route" => self.route.clone(), "status" => code.clone())
                .increment(1);
        }
        metrics::counter!("http_requests_total", "method" => self.method.clone(), "route" => self.route.clone(), "status" => code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds", "method" => self.method, "route" => self.route)
            .record(seconds);
    }
}

pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let labels = RouteLabels::of(&request);
    let started = Instant::now();

    let response = next.run(request).await;
    labels.record(response.status(), started.elapsed().as_secs_f64());
    response
}
