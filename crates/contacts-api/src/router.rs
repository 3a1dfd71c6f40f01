//! Route definitions for the contacts HTTP API.
//!
//! Application routes are mounted under `/api`; the root, health and
//! rate-limited `/me` route sit at the top level.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Upper bound for request bodies, sized for avatar uploads.
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Build the Axum router with all routes and the request-logging layer.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(contact_routes())
        .merge(user_routes());

    let limited = Router::new()
        .route("/me", get(handlers::health::rate_limited_greeting))
        .layer(axum_middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            middleware::rate_limit::rate_limit,
        ));

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .merge(limited)
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Signup, login, refresh, confirmation and password reset
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh_token", get(handlers::auth::refresh_token))
        .route(
            "/auth/confirmed_email/{token}",
            get(handlers::auth::confirmed_email),
        )
        .route("/auth/request_email", post(handlers::auth::request_email))
        .route("/auth/forgot-password", post(handlers::auth::forgot_password))
        .route(
            "/auth/reset-password/{token}",
            get(handlers::auth::reset_password_page).post(handlers::auth::reset_password),
        )
}

/// Address book CRUD, search and birthdays
fn contact_routes() -> Router<AppState> {
    let collection = get(handlers::contact::list_contacts).post(handlers::contact::create_contact);
    Router::new()
        .route("/contacts", collection.clone())
        .route("/contacts/", collection)
        .route(
            "/contacts/birthdays",
            get(handlers::contact::upcoming_birthdays),
        )
        .route(
            "/contacts/{id}",
            get(handlers::contact::get_contact)
                .put(handlers::contact::update_contact)
                .delete(handlers::contact::delete_contact),
        )
}

/// Account listing, profile and avatar
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/", get(handlers::user::list_users))
        .route("/users/me", get(handlers::user::me))
        .route("/users/avatar", patch(handlers::user::update_avatar))
        .route("/users/{id}", get(handlers::user::get_user))
}
