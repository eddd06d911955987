use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Admin Router Module
///
/// Mounted under `/admin` and wrapped by the session guard layer, so every
/// request reaching a handler already belongs to a user with a recognized role.
///
/// The layer only enforces the minimum bar. Finer capabilities are checked by
/// each handler: content writes need edit, deletes need delete, and the whole
/// `/users` subtree is owner-only.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // Session info and capability flags for the UI.
        .route("/me", get(handlers::get_me))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/unauthorized", get(handlers::unauthorized))
        // Content management.
        .route(
            "/services",
            get(handlers::admin_list_services).post(handlers::create_service),
        )
        .route(
            "/services/{id}",
            put(handlers::update_service).delete(handlers::delete_service),
        )
        .route(
            "/news",
            get(handlers::admin_list_news).post(handlers::create_news),
        )
        .route(
            "/news/{id}",
            put(handlers::update_news).delete(handlers::delete_news),
        )
        .route(
            "/jobs",
            get(handlers::admin_list_jobs).post(handlers::create_job),
        )
        .route(
            "/jobs/{id}",
            put(handlers::update_job).delete(handlers::delete_job),
        )
        // User management (owner only).
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
}
