pub mod freelancers;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    // freelancer CRUD; the backend is hidden behind AppState
    let api = Router::new()
        .route("/api/freelancers", get(freelancers::list).post(freelancers::create))
        .route(
            "/api/freelancers/:id",
            get(freelancers::get_one)
                .patch(freelancers::update)
                .delete(freelancers::delete),
        );

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        // trace wraps cors
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request, headers stay out of the logs
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and handler panics
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
