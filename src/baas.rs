use async_trait::async_trait;
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OnceCell};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    models::SessionTokens,
    session::{Claims, Identity, SESSION_AUDIENCE},
};

/// BaasError
///
/// Failures talking to the hosted auth API.
#[derive(Debug, thiserror::Error)]
pub enum BaasError {
    /// Configuration needed by the backend handle was absent at first use.
    #[error("backend configuration missing: {0}")]
    MissingConfig(&'static str),
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The collaborator answered, but refused the request (bad credentials, duplicate email...).
    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

// 1. The process-wide backend handle

/// BaasClient
///
/// A configured HTTP client for the hosted auth API. Built at most once per
/// process by `LazyBaas` and then shared by reference.
#[derive(Debug, Clone)]
pub struct BaasClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_key: Option<String>,
}

impl BaasClient {
    fn from_config(config: &AppConfig) -> Result<Self, BaasError> {
        let base_url = config
            .supabase_url
            .clone()
            .ok_or(BaasError::MissingConfig("SUPABASE_URL"))?;
        let anon_key = config
            .supabase_anon_key
            .clone()
            .ok_or(BaasError::MissingConfig("SUPABASE_ANON_KEY"))?;

        let http = reqwest::Client::builder()
            .timeout(config.auth_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            service_key: config.supabase_service_key.clone(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn service_key(&self) -> Result<&str, BaasError> {
        self.service_key
            .as_deref()
            .ok_or(BaasError::MissingConfig("SUPABASE_SERVICE_ROLE_KEY"))
    }
}

/// LazyBaas
///
/// Lazy, initialize-once wrapper around `BaasClient`. It is cloned into
/// `AppState` like any other dependency; every clone shares the same cell.
#[derive(Clone)]
pub struct LazyBaas {
    config: AppConfig,
    cell: Arc<OnceCell<BaasClient>>,
}

impl LazyBaas {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// get
    ///
    /// Builds the client on first call. A missing URL or key is reported here,
    /// and the next call retries since nothing was stored.
    pub async fn get(&self) -> Result<&BaasClient, BaasError> {
        self.cell
            .get_or_try_init(|| async { BaasClient::from_config(&self.config) })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

// 2. AuthGateway contract

/// AuthGateway
///
/// The slice of the hosted auth API the back-office needs: password sign-in,
/// sign-out and owner-driven identity provisioning.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, BaasError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BaasError>;

    /// Creates a confirmed identity. The profile row is written separately by the caller.
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: &str,
    ) -> Result<Identity, BaasError>;

    /// Removes an identity. Used to roll back a provisioning whose profile insert failed.
    async fn delete_identity(&self, id: Uuid) -> Result<(), BaasError>;
}

pub type AuthGatewayState = Arc<dyn AuthGateway>;

#[derive(Deserialize)]
struct AdminUserResponse {
    id: Uuid,
    email: Option<String>,
}

#[derive(Deserialize)]
struct BackendErrorBody {
    #[serde(alias = "error_description", alias = "msg", alias = "message")]
    message: Option<String>,
}

async fn rejection(response: reqwest::Response) -> BaasError {
    let status = response.status().as_u16();
    let message = response
        .json::<BackendErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| "request rejected".to_string());

    if status >= 500 {
        BaasError::Unavailable(message)
    } else {
        BaasError::Rejected { status, message }
    }
}

/// SupabaseAuthGateway
///
/// `AuthGateway` over the hosted GoTrue-style REST API.
#[derive(Clone)]
pub struct SupabaseAuthGateway {
    baas: LazyBaas,
}

impl SupabaseAuthGateway {
    pub fn new(baas: LazyBaas) -> Self {
        Self { baas }
    }
}

#[async_trait]
impl AuthGateway for SupabaseAuthGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, BaasError> {
        let client = self.baas.get().await?;
        let response = client
            .http
            .post(client.auth_url("/token?grant_type=password"))
            .header("apikey", &client.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(response.json::<SessionTokens>().await?)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BaasError> {
        let client = self.baas.get().await?;
        let response = client
            .http
            .post(client.auth_url("/logout"))
            .header("apikey", &client.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: &str,
    ) -> Result<Identity, BaasError> {
        let client = self.baas.get().await?;
        let service_key = client.service_key()?;
        let response = client
            .http
            .post(client.auth_url("/admin/users"))
            .header("apikey", service_key)
            .bearer_auth(service_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "email_confirm": true,
                "user_metadata": { "name": name, "role": role },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let user = response.json::<AdminUserResponse>().await?;
        Ok(Identity {
            id: user.id,
            email: user.email,
        })
    }

    async fn delete_identity(&self, id: Uuid) -> Result<(), BaasError> {
        let client = self.baas.get().await?;
        let service_key = client.service_key()?;
        let response = client
            .http
            .delete(client.auth_url(&format!("/admin/users/{id}")))
            .header("apikey", service_key)
            .bearer_auth(service_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }
}

// 3. The Mock Implementation (for tests and local runs without a backend)

/// MockAuthGateway
///
/// Deterministic `AuthGateway`. Accepts any password except `"wrong"` and
/// records which identities were deleted so provisioning rollback can be asserted.
///
/// Sign-in returns an opaque token unless the gateway was given a signing
/// secret and the email belongs to a registered account; then it issues a
/// session JWT that `BaasSessionResolver` accepts.
#[derive(Clone, Default)]
pub struct MockAuthGateway {
    /// When true, every call fails as if the backend were down.
    pub should_fail: bool,
    pub deleted: Arc<Mutex<Vec<Uuid>>>,
    pub signed_out: Arc<Mutex<Vec<String>>>,
    session_secret: Option<String>,
    accounts: HashMap<String, Uuid>,
}

impl MockAuthGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn issuing_sessions(mut self, secret: &str) -> Self {
        self.session_secret = Some(secret.to_string());
        self
    }

    pub fn with_account(mut self, email: &str, id: Uuid) -> Self {
        self.accounts.insert(email.to_string(), id);
        self
    }

    pub async fn deleted_identities(&self) -> Vec<Uuid> {
        self.deleted.lock().await.clone()
    }

    pub async fn signed_out_tokens(&self) -> Vec<String> {
        self.signed_out.lock().await.clone()
    }

    fn access_token(&self, email: &str) -> Result<String, BaasError> {
        let (Some(secret), Some(id)) = (&self.session_secret, self.accounts.get(email)) else {
            return Ok(format!("mock-access-{email}"));
        };
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: *id,
            email: Some(email.to_string()),
            aud: SESSION_AUDIENCE.to_string(),
            iat: now,
            exp: now + 3600,
        };
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| BaasError::Unavailable(format!("mock token signing failed: {e}")))
    }

    fn check(&self) -> Result<(), BaasError> {
        if self.should_fail {
            return Err(BaasError::Unavailable(
                "Mock backend error: simulation requested".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, BaasError> {
        self.check()?;
        if password == "wrong" {
            return Err(BaasError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            });
        }
        Ok(SessionTokens {
            access_token: self.access_token(email)?,
            refresh_token: "mock-refresh".to_string(),
            expires_in: 3600,
            token_type: "bearer".to_string(),
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BaasError> {
        self.check()?;
        self.signed_out.lock().await.push(access_token.to_string());
        Ok(())
    }

    async fn create_identity(
        &self,
        email: &str,
        _password: &str,
        _name: &str,
        _role: &str,
    ) -> Result<Identity, BaasError> {
        self.check()?;
        Ok(Identity {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        })
    }

    async fn delete_identity(&self, id: Uuid) -> Result<(), BaasError> {
        self.check()?;
        self.deleted.lock().await.push(id);
        Ok(())
    }
}
