//! API routes

pub mod auth;
pub mod cart;
pub mod health;
pub mod inventory;
pub mod orders;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, require_auth};
use crate::state::AppState;

/// Admin multipart bodies carry a 5MB image plus text fields
const MAX_UPLOAD_BODY: usize = 8 * 1024 * 1024;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public: catalog read, registration, session management
    let public = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/check-session", get(auth::check_session))
        .route("/api/inventory", get(inventory::list_products));

    // Any logged-in user: cart, checkout, order history
    let authed = Router::new()
        .route("/api/cart", get(cart::get_cart))
        .route("/api/cart/add", post(cart::add_to_cart))
        .route("/api/cart/checkout", post(cart::checkout))
        .route("/api/cart/{item_id}", delete(cart::remove_from_cart))
        .route("/api/orders", get(orders::list_orders))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin only: inventory writes (multipart, may carry an image)
    let admin = Router::new()
        .route("/api/inventory", post(inventory::create_product))
        .route(
            "/api/inventory/{id}",
            put(inventory::update_product).delete(inventory::delete_product),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(authed)
        .merge(admin)
        .nest_service("/uploads", ServeDir::new(state.uploads.dir()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
