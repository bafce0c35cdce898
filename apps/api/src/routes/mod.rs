pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/optimize-posts",
            post(handlers::handle_optimize_posts).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/hashtags",
            post(handlers::handle_hashtags).fallback(handlers::method_not_allowed),
        )
        // Drafts have no length cap.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
