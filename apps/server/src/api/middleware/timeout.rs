//! Overall per-request deadline.

use std::time::Duration;

use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response};

/// Bound the whole request by one deadline. On expiry the in-flight work is
/// dropped (abandoning any pending store round-trip) and the client gets a
/// timeout error, never a partial result.
pub async fn deadline(duration: Duration, req: Request, next: Next) -> Response {
    match tokio::time::timeout(duration, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout_s = duration.as_secs(), "Request deadline exceeded");
            crate::Error::Timeout.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, http::StatusCode, routing::get, Router};
    use tower::ServiceExt as _;

    fn app(timeout: Duration) -> Router {
        Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "done"
                }),
            )
            .route("/fast", get(|| async { "done" }))
            .layer(axum::middleware::from_fn(move |req, next| {
                deadline(timeout, req, next)
            }))
    }

    #[tokio::test]
    async fn slow_requests_fail_with_timeout() {
        let response = app(Duration::from_millis(20))
            .oneshot(
                HttpRequest::builder()
                    .uri("/slow")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn fast_requests_pass_through() {
        let response = app(Duration::from_secs(5))
            .oneshot(
                HttpRequest::builder()
                    .uri("/fast")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
