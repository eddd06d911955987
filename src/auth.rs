use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
    guard::{self, Redirect},
    policy::{Capability, CapabilitySet},
    roles::Role,
    session::{Credentials, SessionState},
};

/// Header carrying a raw profile id for the local development bypass.
pub const DEV_USER_HEADER: &str = "x-user-id";

/// AuthUser
///
/// A caller who passed the back-office minimum bar: a verified identity whose
/// profile holds a recognized role. Handlers ask it for finer capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub role: Role,
}

impl AuthUser {
    /// require
    ///
    /// Server-side duplicate of the UI gate for one action. An authenticated
    /// user lacking the capability is sent to the unauthorized page, not to sign-in.
    pub fn require(&self, capability: Capability) -> Result<(), Redirect> {
        if capability.allows(Some(self.role)) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.id,
                role = %self.role,
                ?capability,
                "capability denied"
            );
            Err(Redirect::Unauthorized)
        }
    }

    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::for_role(Some(self.role))
    }
}

/// credentials_from_parts
///
/// Collects what the request presents. The `x-user-id` bypass is ignored
/// outside `Env::Local`.
pub fn credentials_from_parts(parts: &Parts, env: &Env) -> Credentials {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    let dev_user_id = match env {
        Env::Local => parts
            .headers
            .get(DEV_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw).ok()),
        Env::Production => None,
    };

    Credentials {
        bearer,
        dev_user_id,
    }
}

impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        Ok(credentials_from_parts(parts, &config.env))
    }
}

/// AuthUser Extractor Implementation
///
/// Runs the guard's minimum-bar resolution. When the admin router's middleware
/// already resolved the user for this request, the cached value is reused so
/// the backend is asked only once.
///
/// Rejection: a `303` to the sign-in page on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let sessions = SessionState::from_ref(state);
        let config = AppConfig::from_ref(state);
        let credentials = credentials_from_parts(parts, &config.env);

        let user =
            guard::resolve_principal(sessions.as_ref(), &credentials, config.auth_timeout).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
