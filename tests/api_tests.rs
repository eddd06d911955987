use gov_portal::{
    AppConfig, AppState, create_router,
    baas::MockAuthGateway,
    config::Env,
    models::{MeResponse, Service},
    repository::{InMemoryRepository, RepositoryState},
    session::{BaasSessionResolver, Claims, SESSION_AUDIENCE},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use reqwest::{StatusCode, redirect::Policy};
use std::{sync::Arc, time::SystemTime};
use tokio::net::TcpListener;
use uuid::Uuid;

const OWNER_ID: Uuid = Uuid::from_u128(10);
const ADMIN_ID: Uuid = Uuid::from_u128(20);
const MODERATOR_ID: Uuid = Uuid::from_u128(30);
const ROLELESS_ID: Uuid = Uuid::from_u128(40);

pub struct TestApp {
    pub address: String,
    pub repo: InMemoryRepository,
    pub config: AppConfig,
}

async fn spawn_app(env: Env) -> TestApp {
    let repo = InMemoryRepository::new();
    repo.seed_profile(OWNER_ID, "Olga Owner", "owner").await;
    repo.seed_profile(ADMIN_ID, "Adam Admin", "admin").await;
    repo.seed_profile(MODERATOR_ID, "Mona Moderator", "moderator").await;
    repo.seed_profile(ROLELESS_ID, "Rick Roleless", "superadmin").await;

    let mut config = AppConfig::default();
    config.env = env;

    let shared = Arc::new(repo.clone()) as RepositoryState;
    let state = AppState {
        sessions: Arc::new(BaasSessionResolver::new(shared.clone(), &config.jwt_secret)),
        repo: shared,
        auth: Arc::new(MockAuthGateway::new()),
        config: config.clone(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        repo,
        config,
    }
}

/// Redirects are asserted, not followed.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

fn session_token(user_id: Uuid, secret: &str) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = Claims {
        sub: user_id,
        email: Some("staff@portal.test".to_string()),
        aud: SESSION_AUDIENCE.to_string(),
        iat: now as usize,
        exp: (now + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn service_body(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Issue of a new identity card",
        "duration": "5 days",
        "requirements": "Photo",
        "procedure": "Apply online",
        "department": "Interior",
        "cost": "10 EUR"
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(Env::Local).await;
    let response = client()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_anonymous_admin_request_redirects_to_sign_in() {
    let app = spawn_app(Env::Local).await;
    let response = client()
        .get(format!("{}/admin/me", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin-login");
}

#[tokio::test]
async fn test_unrecognized_role_redirects_to_sign_in() {
    let app = spawn_app(Env::Local).await;
    let response = client()
        .get(format!("{}/admin/dashboard", app.address))
        .header("x-user-id", ROLELESS_ID.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin-login");
}

#[tokio::test]
async fn test_bearer_session_in_production() {
    let app = spawn_app(Env::Production).await;
    let token = session_token(OWNER_ID, &app.config.jwt_secret);

    let response = client()
        .get(format!("{}/admin/me", app.address))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let me: MeResponse = response.json().await.unwrap();
    assert_eq!(me.id, OWNER_ID);
    assert!(me.capabilities.can_manage_users);

    // The development header carries no weight in production.
    let response = client()
        .get(format!("{}/admin/me", app.address))
        .header("x-user-id", OWNER_ID.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_moderator_write_redirects_to_unauthorized() {
    let app = spawn_app(Env::Local).await;
    let response = client()
        .post(format!("{}/admin/services", app.address))
        .header("x-user-id", MODERATOR_ID.to_string())
        .json(&service_body("Identity card"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/unauthorized");
    assert!(app.repo.admin_actions().await.is_empty());

    let landing = client()
        .get(format!("{}/admin/unauthorized", app.address))
        .header("x-user-id", MODERATOR_ID.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(landing.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_publishes_service_visible_publicly() {
    let app = spawn_app(Env::Local).await;
    let response = client()
        .post(format!("{}/admin/services", app.address))
        .header("x-user-id", ADMIN_ID.to_string())
        .json(&service_body("Identity card"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Service = response.json().await.unwrap();

    let listed: Vec<Service> = client()
        .get(format!("{}/services", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.iter().any(|s| s.id == created.id));

    let detail = client()
        .get(format!("{}/services/{}", app.address, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(detail.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_management_is_owner_only() {
    let app = spawn_app(Env::Local).await;

    let as_admin = client()
        .get(format!("{}/admin/users", app.address))
        .header("x-user-id", ADMIN_ID.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(as_admin.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&as_admin), "/admin/unauthorized");

    let as_owner = client()
        .get(format!("{}/admin/users", app.address))
        .header("x-user-id", OWNER_ID.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(as_owner.status(), StatusCode::OK);

    let delete = client()
        .delete(format!("{}/admin/users/{}", app.address, ADMIN_ID))
        .header("x-user-id", OWNER_ID.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_validation_error_body() {
    let app = spawn_app(Env::Local).await;
    let mut body = service_body("Identity card");
    body["department"] = serde_json::json!("");

    let response = client()
        .post(format!("{}/admin/services", app.address))
        .header("x-user-id", OWNER_ID.to_string())
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["code"], "validation_failed");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = spawn_app(Env::Local).await;
    let doc: serde_json::Value = client()
        .get(format!("{}/api-docs/openapi.json", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(doc["paths"]["/admin/services"].is_object());
    assert!(doc["paths"]["/jobs/departments"].is_object());
}

#[tokio::test]
async fn test_router_oneshot_propagates_request_id() {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    let repo = InMemoryRepository::new();
    repo.seed_profile(MODERATOR_ID, "Mona Moderator", "moderator").await;
    let config = AppConfig::default();
    let shared = Arc::new(repo) as RepositoryState;
    let router = create_router(AppState {
        sessions: Arc::new(BaasSessionResolver::new(shared.clone(), &config.jwt_secret)),
        repo: shared,
        auth: Arc::new(MockAuthGateway::new()),
        config,
    });

    let response = router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/admin/news/{}", Uuid::new_v4()))
                .header("x-user-id", MODERATOR_ID.to_string())
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/admin/unauthorized");
    assert_eq!(response.headers()["x-request-id"], "req-123");
}
