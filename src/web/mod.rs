pub mod routes;
pub mod sse;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use state::AppState;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(routes::dashboard))
        .route("/upload", post(routes::upload))
        .route("/reset", post(routes::reset))
        .route("/export.csv", get(routes::export))
        .route("/api/report", get(routes::api_report))
        .route("/sse", get(sse::sse_handler))
        .nest_service("/static", ServeDir::new("templates/static"))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
