use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints any visitor may call. Nothing here mutates content; the only
/// writes are to the visitor's own session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        .route("/health", get(|| async { "ok" }))
        // Services catalog. `/popular` feeds the home page.
        .route("/services", get(handlers::list_services))
        .route("/services/popular", get(handlers::popular_services))
        .route("/services/{id}", get(handlers::get_service))
        // News, newest first. `/latest?limit=` defaults to five entries.
        .route("/news", get(handlers::list_news))
        .route("/news/latest", get(handlers::latest_news))
        .route("/news/{id}", get(handlers::get_news))
        // Vacancies.
        .route("/jobs", get(handlers::list_jobs))
        .route("/jobs/latest", get(handlers::latest_jobs))
        .route("/jobs/departments", get(handlers::jobs_by_department))
        .route("/jobs/{id}", get(handlers::get_job))
        // Session management against the hosted auth API.
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
}
