use axum::{http::StatusCode, http::Uri, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::error::AppError;
use crate::core::middleware::{handle_panic, MakeRequestUuid, MakeSpanWithRequestId};

/// Simple health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Fallback for unknown routes
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.to_string())
}

/// Wrap feature routes with the health check, 404 fallback and the
/// request-id / tracing / panic layers
pub fn build_app(routes: Router) -> Router {
    Router::new()
        .merge(routes)
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{MSG_NOT_FOUND, MSG_SERVER_ERROR};
    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;

    const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

    async fn boom() -> &'static str {
        panic!("boom")
    }

    fn server() -> TestServer {
        let routes = Router::new().route("/boom", get(boom));
        TestServer::new(build_app(routes)).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        server().get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_unknown_route_renders_form_with_404() {
        let response = server().get("/missing").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body = response.text();
        assert!(body.contains(MSG_NOT_FOUND));
        assert!(body.contains("name=\"photo\""));
    }

    #[tokio::test]
    async fn test_panic_renders_server_error_page() {
        let response = server().get("/boom").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains(MSG_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = server()
            .get("/health")
            .add_header(X_REQUEST_ID, HeaderValue::from_static("client-supplied-id"))
            .await;

        assert_eq!(response.header(X_REQUEST_ID), "client-supplied-id");
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let response = server().get("/health").await;

        let id = response.header(X_REQUEST_ID);
        assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }
}
