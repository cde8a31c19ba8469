use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::locator::handlers::{index, show_map, upload_photo};
use crate::features::locator::services::LocatorService;

/// Create routes for the locator feature
pub fn routes(service: Arc<LocatorService>, max_request_body_size: usize) -> Router {
    Router::new()
        .route(
            "/",
            get(index)
                .post(upload_photo)
                .layer(DefaultBodyLimit::max(max_request_body_size)),
        )
        .route("/maps/{id}", get(show_map))
        .with_state(service)
}
