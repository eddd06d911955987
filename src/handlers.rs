use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    guard,
    models::{
        self, AdminAction, CreateUserRequest, DashboardResponse, JobInput, JobPosting, LoginRequest,
        MeResponse, NewProfile, NewsInput, NewsItem, Service, ServiceInput, SessionTokens,
        UpdateUserRequest, UserSummary,
    },
    policy::{Action, Resource, required_capability},
    roles::is_valid_role,
    session::Credentials,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Number of entries on the home page "latest" widgets.
const DEFAULT_LATEST_LIMIT: i64 = 5;
/// Number of cards in the "popular services" block.
const POPULAR_SERVICES_LIMIT: i64 = 4;

// --- Filter Structs ---

/// LatestFilter
///
/// Query parameters for the `/latest` listings.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct LatestFilter {
    /// Maximum number of entries (defaults to 5).
    pub limit: Option<i64>,
}

impl LatestFilter {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LATEST_LIMIT).clamp(1, 50)
    }
}

// --- Helpers ---

/// require_fields
///
/// Every listed field must be non-blank.
fn require_fields(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "all fields are required; missing: {}",
            missing.join(", ")
        )))
    }
}

fn validate_service(input: &ServiceInput) -> Result<(), ApiError> {
    require_fields(&[
        ("title", &input.title),
        ("description", &input.description),
        ("duration", &input.duration),
        ("requirements", &input.requirements),
        ("procedure", &input.procedure),
        ("department", &input.department),
        ("cost", &input.cost),
    ])
}

fn validate_news(input: &NewsInput) -> Result<(), ApiError> {
    require_fields(&[
        ("title", &input.title),
        ("summary", &input.summary),
        ("content", &input.content),
        ("author", &input.author),
        ("category", &input.category),
    ])
}

fn validate_job(input: &JobInput) -> Result<(), ApiError> {
    require_fields(&[
        ("title", &input.title),
        ("department", &input.department),
        ("location", &input.location),
        ("description", &input.description),
        ("requirements", &input.requirements),
        ("salary", &input.salary),
        ("type", &input.job_type),
        ("contactEmail", &input.contact_email),
        ("contactPhone", &input.contact_phone),
    ])
}

fn validate_assignable_role(role: &str) -> Result<(), ApiError> {
    if is_valid_role(role) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("unrecognized role: {role:?}")))
    }
}

/// guard_action
///
/// Server-side enforcement point: the same predicate the UI uses to hide the
/// affordance is evaluated again before anything is written.
fn guard_action(user: &AuthUser, action: Action, resource: Resource) -> Result<(), ApiError> {
    user.require(required_capability(action, resource))?;
    Ok(())
}

/// record_action
///
/// Appends to the audit trail. A failed audit write is logged but never
/// undoes or fails the mutation it describes.
async fn record_action(
    state: &AppState,
    user: &AuthUser,
    action: Action,
    resource: Resource,
    entity_id: Uuid,
    details: Option<serde_json::Value>,
) {
    let entry = AdminAction {
        user_id: user.id,
        action_type: action.as_str().to_string(),
        entity_type: resource.as_str().to_string(),
        entity_id,
        details,
    };
    if let Err(e) = state.repo.log_admin_action(entry).await {
        tracing::error!(user_id = %user.id, "failed to record admin action: {:?}", e);
    }
}

fn me_response(user: &AuthUser) -> MeResponse {
    MeResponse {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        capabilities: user.capabilities(),
    }
}

// --- Public Handlers: Services ---

/// list_services
///
/// [Public Route] The full service catalog, alphabetical.
#[utoipa::path(
    get,
    path = "/services",
    responses((status = 200, description = "Service catalog", body = [Service]))
)]
pub async fn list_services(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.repo.list_services().await)
}

/// popular_services
///
/// [Public Route] The four most viewed services for the home page.
#[utoipa::path(
    get,
    path = "/services/popular",
    responses((status = 200, description = "Most viewed services", body = [Service]))
)]
pub async fn popular_services(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.repo.popular_services(POPULAR_SERVICES_LIMIT).await)
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Found", body = Service),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, ApiError> {
    state
        .repo
        .get_service(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// --- Public Handlers: News ---

/// list_news
///
/// [Public Route] Every news item, newest first.
#[utoipa::path(
    get,
    path = "/news",
    responses((status = 200, description = "All news", body = [NewsItem]))
)]
pub async fn list_news(State(state): State<AppState>) -> Json<Vec<NewsItem>> {
    Json(state.repo.list_news(None).await)
}

#[utoipa::path(
    get,
    path = "/news/latest",
    params(LatestFilter),
    responses((status = 200, description = "Latest news", body = [NewsItem]))
)]
pub async fn latest_news(
    State(state): State<AppState>,
    Query(filter): Query<LatestFilter>,
) -> Json<Vec<NewsItem>> {
    Json(state.repo.list_news(Some(filter.limit())).await)
}

#[utoipa::path(
    get,
    path = "/news/{id}",
    params(("id" = Uuid, Path, description = "News item ID")),
    responses(
        (status = 200, description = "Found", body = NewsItem),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NewsItem>, ApiError> {
    state
        .repo
        .get_news(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// --- Public Handlers: Jobs ---

#[utoipa::path(
    get,
    path = "/jobs",
    responses((status = 200, description = "All vacancies", body = [JobPosting]))
)]
pub async fn list_jobs(State(state): State<AppState>) -> Json<Vec<JobPosting>> {
    Json(state.repo.list_jobs(None).await)
}

#[utoipa::path(
    get,
    path = "/jobs/latest",
    params(LatestFilter),
    responses((status = 200, description = "Latest vacancies", body = [JobPosting]))
)]
pub async fn latest_jobs(
    State(state): State<AppState>,
    Query(filter): Query<LatestFilter>,
) -> Json<Vec<JobPosting>> {
    Json(state.repo.list_jobs(Some(filter.limit())).await)
}

/// jobs_by_department
///
/// [Public Route] Vacancies bucketed by department, as the vacancies page lists them.
#[utoipa::path(
    get,
    path = "/jobs/departments",
    responses((status = 200, description = "Vacancies per department", body = BTreeMap<String, Vec<JobPosting>>))
)]
pub async fn jobs_by_department(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, Vec<JobPosting>>> {
    let jobs = state.repo.list_jobs(None).await;
    Json(models::group_jobs_by_department(jobs))
}

#[utoipa::path(
    get,
    path = "/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job posting ID")),
    responses(
        (status = 200, description = "Found", body = JobPosting),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobPosting>, ApiError> {
    state
        .repo
        .get_job(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// --- Session Handlers ---

/// login
///
/// [Public Route] Password sign-in against the hosted auth API. The returned
/// access token is what the back-office sends as `Authorization: Bearer`.
/// Accounts without a recognized back-office role are signed out again and refused.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionTokens),
        (status = 400, description = "Invalid credentials"),
        (status = 403, description = "Account has no back-office role"),
        (status = 422, description = "Missing email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionTokens>, ApiError> {
    require_fields(&[("email", &payload.email), ("password", &payload.password)])?;
    let tokens = state.auth.sign_in(&payload.email, &payload.password).await?;

    let credentials = Credentials {
        bearer: Some(tokens.access_token.clone()),
        dev_user_id: None,
    };
    let principal =
        guard::resolve_principal(state.sessions.as_ref(), &credentials, state.config.auth_timeout)
            .await;
    if principal.is_err() {
        tracing::warn!("sign-in refused: account has no back-office role");
        if let Err(e) = state.auth.sign_out(&tokens.access_token).await {
            tracing::error!("failed to revoke refused session: {:?}", e);
        }
        return Err(ApiError::Forbidden(
            "this account has no access to the back-office".to_string(),
        ));
    }
    Ok(Json(tokens))
}

/// logout
///
/// [Public Route] Revokes the presented session. Without a token there is nothing to revoke.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Signed out"))
)]
pub async fn logout(
    State(state): State<AppState>,
    credentials: Credentials,
) -> Result<StatusCode, ApiError> {
    if let Some(token) = credentials.bearer.as_deref() {
        state.auth.sign_out(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Admin Handlers: Session & Dashboard ---

/// get_me
///
/// [Admin Route] The signed-in user and the capability flags the UI uses to
/// show or hide edit, delete and user-management affordances.
#[utoipa::path(
    get,
    path = "/admin/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 303, description = "Redirect to sign-in")
    )
)]
pub async fn get_me(user: AuthUser) -> Json<MeResponse> {
    Json(me_response(&user))
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 303, description = "Redirect to sign-in")
    )
)]
pub async fn get_dashboard(user: AuthUser, State(state): State<AppState>) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        user: me_response(&user),
        stats: state.repo.get_stats().await,
    })
}

// --- Admin Handlers: Services ---

/// admin_list_services
///
/// [Admin Route] Management view of the catalog. Viewing only needs the minimum bar.
#[utoipa::path(
    get,
    path = "/admin/services",
    responses((status = 200, description = "Services", body = [Service]))
)]
pub async fn admin_list_services(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Service>>, ApiError> {
    guard_action(&user, Action::View, Resource::Service)?;
    Ok(Json(state.repo.list_services().await))
}

/// create_service
///
/// [Admin Route] Requires the edit-content capability (owner, admin).
#[utoipa::path(
    post,
    path = "/admin/services",
    request_body = ServiceInput,
    responses(
        (status = 201, description = "Created", body = Service),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 422, description = "Missing fields")
    )
)]
pub async fn create_service(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ServiceInput>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    guard_action(&user, Action::Create, Resource::Service)?;
    validate_service(&payload)?;

    let service = state.repo.create_service(payload).await?;
    record_action(&state, &user, Action::Create, Resource::Service, service.id, None).await;
    Ok((StatusCode::CREATED, Json(service)))
}

#[utoipa::path(
    put,
    path = "/admin/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = ServiceInput,
    responses(
        (status = 200, description = "Updated", body = Service),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_service(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServiceInput>,
) -> Result<Json<Service>, ApiError> {
    guard_action(&user, Action::Edit, Resource::Service)?;
    validate_service(&payload)?;

    let service = state
        .repo
        .update_service(id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    record_action(&state, &user, Action::Edit, Resource::Service, id, None).await;
    Ok(Json(service))
}

/// delete_service
///
/// [Admin Route] Requires the delete-content capability (owner, admin).
#[utoipa::path(
    delete,
    path = "/admin/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_service(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    guard_action(&user, Action::Delete, Resource::Service)?;

    if !state.repo.delete_service(id).await? {
        return Err(ApiError::NotFound);
    }
    record_action(&state, &user, Action::Delete, Resource::Service, id, None).await;
    Ok(StatusCode::NO_CONTENT)
}

// --- Admin Handlers: News ---

#[utoipa::path(
    get,
    path = "/admin/news",
    responses((status = 200, description = "News", body = [NewsItem]))
)]
pub async fn admin_list_news(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsItem>>, ApiError> {
    guard_action(&user, Action::View, Resource::News)?;
    Ok(Json(state.repo.list_news(None).await))
}

#[utoipa::path(
    post,
    path = "/admin/news",
    request_body = NewsInput,
    responses(
        (status = 201, description = "Created", body = NewsItem),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 422, description = "Missing fields")
    )
)]
pub async fn create_news(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<NewsInput>,
) -> Result<(StatusCode, Json<NewsItem>), ApiError> {
    guard_action(&user, Action::Create, Resource::News)?;
    validate_news(&payload)?;

    let item = state.repo.create_news(payload).await?;
    record_action(&state, &user, Action::Create, Resource::News, item.id, None).await;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/admin/news/{id}",
    params(("id" = Uuid, Path, description = "News item ID")),
    request_body = NewsInput,
    responses(
        (status = 200, description = "Updated", body = NewsItem),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_news(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewsInput>,
) -> Result<Json<NewsItem>, ApiError> {
    guard_action(&user, Action::Edit, Resource::News)?;
    validate_news(&payload)?;

    let item = state
        .repo
        .update_news(id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    record_action(&state, &user, Action::Edit, Resource::News, id, None).await;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/admin/news/{id}",
    params(("id" = Uuid, Path, description = "News item ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_news(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    guard_action(&user, Action::Delete, Resource::News)?;

    if !state.repo.delete_news(id).await? {
        return Err(ApiError::NotFound);
    }
    record_action(&state, &user, Action::Delete, Resource::News, id, None).await;
    Ok(StatusCode::NO_CONTENT)
}

// --- Admin Handlers: Jobs ---

#[utoipa::path(
    get,
    path = "/admin/jobs",
    responses((status = 200, description = "Vacancies", body = [JobPosting]))
)]
pub async fn admin_list_jobs(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<JobPosting>>, ApiError> {
    guard_action(&user, Action::View, Resource::Job)?;
    Ok(Json(state.repo.list_jobs(None).await))
}

#[utoipa::path(
    post,
    path = "/admin/jobs",
    request_body = JobInput,
    responses(
        (status = 201, description = "Created", body = JobPosting),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 422, description = "Missing fields")
    )
)]
pub async fn create_job(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<JobInput>,
) -> Result<(StatusCode, Json<JobPosting>), ApiError> {
    guard_action(&user, Action::Create, Resource::Job)?;
    validate_job(&payload)?;

    let job = state.repo.create_job(payload).await?;
    record_action(&state, &user, Action::Create, Resource::Job, job.id, None).await;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    put,
    path = "/admin/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job posting ID")),
    request_body = JobInput,
    responses(
        (status = 200, description = "Updated", body = JobPosting),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_job(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobInput>,
) -> Result<Json<JobPosting>, ApiError> {
    guard_action(&user, Action::Edit, Resource::Job)?;
    validate_job(&payload)?;

    let job = state
        .repo
        .update_job(id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    record_action(&state, &user, Action::Edit, Resource::Job, id, None).await;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/admin/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job posting ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_job(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    guard_action(&user, Action::Delete, Resource::Job)?;

    if !state.repo.delete_job(id).await? {
        return Err(ApiError::NotFound);
    }
    record_action(&state, &user, Action::Delete, Resource::Job, id, None).await;
    Ok(StatusCode::NO_CONTENT)
}

// --- Admin Handlers: Users (owner only) ---

/// list_users
///
/// [Admin Route] Every profile. Unrecognized stored roles are reported as `null`.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "Users", body = [UserSummary]),
        (status = 303, description = "Redirect to unauthorized")
    )
)]
pub async fn list_users(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    guard_action(&user, Action::View, Resource::User)?;
    let users = state
        .repo
        .list_profiles()
        .await
        .into_iter()
        .map(UserSummary::from)
        .collect();
    Ok(Json(users))
}

/// create_user
///
/// [Admin Route] Provisions an identity with the auth collaborator, then its
/// profile. If the profile insert fails the fresh identity is deleted again so
/// no role-less account is left behind.
#[utoipa::path(
    post,
    path = "/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = UserSummary),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 422, description = "Missing fields or unrecognized role")
    )
)]
pub async fn create_user(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    guard_action(&user, Action::Create, Resource::User)?;
    require_fields(&[
        ("email", &payload.email),
        ("password", &payload.password),
        ("name", &payload.name),
        ("role", &payload.role),
    ])?;
    validate_assignable_role(&payload.role)?;

    let identity = state
        .auth
        .create_identity(&payload.email, &payload.password, &payload.name, &payload.role)
        .await?;

    let new_profile = NewProfile {
        id: identity.id,
        name: payload.name,
        role: payload.role,
    };
    let profile = match state.repo.create_profile(new_profile).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(identity_id = %identity.id, "profile insert failed, rolling back identity");
            if let Err(rollback) = state.auth.delete_identity(identity.id).await {
                tracing::error!(identity_id = %identity.id, "identity rollback failed: {:?}", rollback);
            }
            return Err(e.into());
        }
    };

    record_action(
        &state,
        &user,
        Action::Create,
        Resource::User,
        profile.id,
        Some(serde_json::json!({ "role": profile.role })),
    )
    .await;
    Ok((StatusCode::CREATED, Json(UserSummary::from(profile))))
}

/// update_user
///
/// [Admin Route] Changes another user's display name and/or role.
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserSummary),
        (status = 303, description = "Redirect to unauthorized"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Unrecognized role or blank name")
    )
)]
pub async fn update_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    guard_action(&user, Action::Edit, Resource::User)?;
    if let Some(name) = payload.name.as_deref() {
        require_fields(&[("name", name)])?;
    }
    if let Some(role) = payload.role.as_deref() {
        validate_assignable_role(role)?;
    }
    if payload.name.is_none() && payload.role.is_none() {
        return Err(ApiError::BadRequest("nothing to update".to_string()));
    }

    let details = serde_json::to_value(&payload).ok();
    let profile = state
        .repo
        .update_profile(id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    record_action(&state, &user, Action::Edit, Resource::User, id, details).await;
    Ok(Json(UserSummary::from(profile)))
}

/// delete_user
///
/// [Admin Route] User deletion is not offered yet. The owner check still runs
/// first so the stub does not reveal anything to other roles.
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 303, description = "Redirect to unauthorized"),
        (status = 501, description = "Not implemented")
    )
)]
pub async fn delete_user(user: AuthUser, Path(_id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    guard_action(&user, Action::Delete, Resource::User)?;
    Err(ApiError::NotImplemented)
}

/// unauthorized
///
/// [Admin Route] Landing page for back-office users who tried an action their
/// role does not grant.
#[utoipa::path(
    get,
    path = "/admin/unauthorized",
    responses((status = 403, description = "Action not permitted for this role"))
)]
pub async fn unauthorized(user: AuthUser) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({
            "code": "unauthorized",
            "message": "your role does not permit this action",
            "role": user.role,
        })),
    )
}
