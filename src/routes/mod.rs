pub mod frames;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::middleware::request_id;
use crate::state::AppState;

/// Maximum request body size: 8 MiB. Base64-encoded 1080p captures run
/// 1-2 MiB; this leaves headroom without accepting arbitrary uploads.
const MAX_BODY_SIZE: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(frames::root_info))
        .route("/process_frame", post(frames::process_frame))
        .nest("/health", health::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}
