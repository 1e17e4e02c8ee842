use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use super::handlers::*;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/lv95towgs84", get(get_lv95_to_wgs84))
        .route("/api/wgs84tolv95", get(get_wgs84_to_lv95))
        .route("/api/interpolate", post(post_interpolate))
        .route("/api/stations", post(upload_stations))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB limit
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
