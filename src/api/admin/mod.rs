//! Admin API endpoints for managing API keys

pub mod api_keys;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::middleware::MAX_BODY_SIZE;
use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api-keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route("/api-keys/revoke", post(api_keys::revoke_api_key))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
}
