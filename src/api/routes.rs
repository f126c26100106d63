use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Task routes sit behind the bearer-token guard
    let tasks = Router::new()
        .route("/tasks", get(handlers::list_tasks))
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/:id", get(handlers::get_task))
        .route("/tasks/:id", put(handlers::update_task))
        .route("/tasks/:id", delete(handlers::delete_task))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            super::middleware::require_auth,
        ));

    // Wildcard CORS, as the original served a separately hosted frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(tasks)
        .route("/login", post(handlers::login))
        .route("/_internal/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
