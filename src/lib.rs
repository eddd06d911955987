use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Access control core.
pub mod guard;
pub mod policy;
pub mod roles;
pub mod session;

// Request plumbing and collaborators.
pub mod auth;
pub mod baas;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

pub mod routes;
use auth::AuthUser;
use routes::{admin, public};

// --- Public Re-exports ---

pub use baas::{AuthGatewayState, LazyBaas, SupabaseAuthGateway};
pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{PostgresRepository, RepositoryState};
pub use session::{BaasSessionResolver, SessionState};

/// ApiDoc
///
/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_services, handlers::popular_services, handlers::get_service,
        handlers::list_news, handlers::latest_news, handlers::get_news,
        handlers::list_jobs, handlers::latest_jobs, handlers::jobs_by_department, handlers::get_job,
        handlers::login, handlers::logout,
        handlers::get_me, handlers::get_dashboard, handlers::unauthorized,
        handlers::admin_list_services, handlers::create_service, handlers::update_service,
        handlers::delete_service,
        handlers::admin_list_news, handlers::create_news, handlers::update_news, handlers::delete_news,
        handlers::admin_list_jobs, handlers::create_job, handlers::update_job, handlers::delete_job,
        handlers::list_users, handlers::create_user, handlers::update_user, handlers::delete_user,
    ),
    components(
        schemas(
            models::Service, models::ServiceInput, models::NewsItem, models::NewsInput,
            models::JobPosting, models::JobInput, models::UserSummary, models::CreateUserRequest,
            models::UpdateUserRequest, models::LoginRequest, models::SessionTokens,
            models::MeResponse, models::AdminDashboardStats, models::DashboardResponse,
            policy::CapabilitySet, roles::Role,
        )
    ),
    tags(
        (name = "gov-portal", description = "Government services portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cloneable container for every collaborator a handler may need.
#[derive(Clone)]
pub struct AppState {
    /// Content, profile and audit storage.
    pub repo: RepositoryState,
    /// Resolves the caller's identity and profile for the guard.
    pub sessions: SessionState,
    /// Hosted auth API: sign-in, sign-out and identity provisioning.
    pub auth: AuthGatewayState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AuthGatewayState {
    fn from_ref(app_state: &AppState) -> AuthGatewayState {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// admin_gate
///
/// Route layer for the `/admin` tree. Extracting `AuthUser` runs the
/// minimum-bar check; a failure short-circuits with a redirect to sign-in.
/// The resolved user is left in the request extensions for the handler.
async fn admin_gate(user: AuthUser, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// create_router
///
/// Assembles routes, the admin guard layer, docs and the observability stack.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .nest(
            "/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                admin_gate,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span per request, correlated by `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
