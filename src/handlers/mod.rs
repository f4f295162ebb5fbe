pub mod analyze;
pub mod health;
pub mod home;

pub use analyze::*;
pub use health::*;
pub use home::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{logging_middleware, rate_limit_middleware};
use crate::state::AppState;

/// Builds the application router with all layers applied.
pub fn create_router(state: AppState) -> Router {
    let analyze_routes = Router::new()
        .route("/analyze", post(analyze_handler))
        .layer(DefaultBodyLimit::max(state.max_file_size_bytes))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .merge(analyze_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}
