pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod validation;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: Config,
}

pub fn create_app(state: AppState) -> Router {
    // Everything that touches a cart or the ledger sits behind the bearer
    // check; signup, login and the catalog stay public.
    let protected = Router::new()
        .route(
            "/cart",
            post(handlers::cart::add_to_cart).get(handlers::cart::get_cart),
        )
        .route(
            "/cart/:id",
            put(handlers::cart::update_cart_item).delete(handlers::cart::delete_cart_item),
        )
        .route("/checkout", post(handlers::transactions::checkout))
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions),
        )
        .route(
            "/transactions/:id",
            get(handlers::transactions::get_transaction),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/signup", post(handlers::auth::sign_up))
        .route("/login", post(handlers::auth::login))
        .route("/products", get(handlers::products::list_products))
        .merge(protected)
        .layer(from_fn(middleware::request_logger::request_logger_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
