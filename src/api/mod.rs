//! API module for the lead dashboard
//!
//! REST interface over uploaded lead sessions, plus the static page that
//! charts them in the browser.

pub mod handlers;
pub mod service;

pub use service::DashboardService;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(service: Arc<DashboardService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/v1/health", get(handlers::health))
        // Sessions
        .route("/api/v1/sessions", post(handlers::create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        // Filter and view state
        .route("/api/v1/sessions/:id/selection", put(handlers::set_selection))
        .route("/api/v1/sessions/:id/selection/all", post(handlers::select_all))
        .route("/api/v1/sessions/:id/view", put(handlers::set_view))
        // Derived tables
        .route("/api/v1/sessions/:id/dashboard", get(handlers::get_dashboard))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
