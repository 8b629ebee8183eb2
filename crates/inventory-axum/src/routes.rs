//! Route definitions and router construction.
//!
//! Unknown paths get a JSON 404. A known path requested with a method it
//! does not serve gets 405 from the method router.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Uri};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::error::HttpError;
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// All inventory routes, without state applied.
pub(crate) fn inventory_routes() -> Router<AppState> {
    Router::new()
        // Static forms
        .route("/RegisterForm.html", get(handlers::forms::register_form))
        .route("/SearchForm.html", get(handlers::forms::search_form))
        // Items
        .route("/register", post(handlers::items::register))
        .route("/inventory", get(handlers::items::list))
        .route(
            "/inventory/{id}",
            get(handlers::items::get)
                .put(handlers::items::update)
                .delete(handlers::items::remove),
        )
        .route(
            "/inventory/{id}/photo",
            get(handlers::photos::get).put(handlers::photos::replace),
        )
        // Search
        .route("/search", post(handlers::search::search))
}

/// Create the main Axum router.
///
/// # Path Parameter Syntax
/// Axum 0.8 uses brace syntax for path parameters: `{id}`
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let body_limit = ctx.max_upload_bytes;
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route("/health", get(health_check))
        .merge(inventory_routes())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_config))
        .with_state(state)
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: Uri) -> HttpError {
    tracing::debug!(target: "inventory.http", %uri, "no route");
    HttpError::NotFound("Not found".to_string())
}
