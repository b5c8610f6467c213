use crate::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(crate::api::handlers::ws::websocket_endpoint))
        .nest_service("/site", ServeDir::new(&state.server.frontend_dir))
        .nest_service("/outputs", ServeDir::new(&state.server.output_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
