//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // User endpoints
        .route("/users", get(handlers::list_users))
        .route("/users/:user_id", get(handlers::get_user))
        // Capability registry
        .route("/tools", get(handlers::list_tools))
        // Recommendation endpoint
        .route("/recommend", post(handlers::recommend))
        .with_state(state)
}
