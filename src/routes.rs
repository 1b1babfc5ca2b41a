use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{create_video, get_video, list_videos, upload_video_file};
use crate::models::AppState;

pub const API_PREFIX: &str = "/api/v1";

/// Versioned API routes, without middleware.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/videos", get(list_videos).post(create_video))
        .route("/videos/:id", get(get_video))
        .route("/video-upload", post(upload_video_file))
}

/// The full application: API group plus CORS and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(API_PREFIX, api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
