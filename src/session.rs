use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{models::Profile, repository::RepositoryState};

/// Identity
///
/// The caller as known to the external auth collaborator. Immutable and not
/// owned by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Credentials
///
/// What a request presented, before anything has been verified.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Raw token from `Authorization: Bearer ...`.
    pub bearer: Option<String>,
    /// `x-user-id` header. Only populated in `Env::Local`.
    pub dev_user_id: Option<Uuid>,
}

/// Claims
///
/// Payload of a session JWT issued by the hosted auth API.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity id, also the primary key of `public.profiles`.
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    /// Audience. Signed-in users carry `authenticated`.
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
}

/// Audience stamped on tokens of signed-in users.
pub const SESSION_AUDIENCE: &str = "authenticated";

/// SessionResolver
///
/// Contract the guard needs from the auth/data collaborator. Neither method
/// reports errors: an unresolvable session and a failed lookup are both `None`,
/// because the guard treats them the same way.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn current_identity(&self, credentials: &Credentials) -> Option<Identity>;

    async fn profile_for_identity(&self, id: Uuid) -> Option<Profile>;
}

pub type SessionState = Arc<dyn SessionResolver>;

/// BaasSessionResolver
///
/// Verifies the backend-issued HS256 session token locally and reads the role
/// from `public.profiles` through the repository.
pub struct BaasSessionResolver {
    repo: RepositoryState,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl BaasSessionResolver {
    pub fn new(repo: RepositoryState, jwt_secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.set_audience(&[SESSION_AUDIENCE]);

        Self {
            repo,
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    fn verify(&self, token: &str) -> Option<Identity> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(Identity {
                id: data.claims.sub,
                email: data.claims.email,
            }),
            Err(e) => {
                tracing::debug!(kind = ?e.kind(), "session token rejected");
                None
            }
        }
    }
}

#[async_trait]
impl SessionResolver for BaasSessionResolver {
    async fn current_identity(&self, credentials: &Credentials) -> Option<Identity> {
        // Local bypass: the profile lookup that follows still has to find this id.
        if let Some(id) = credentials.dev_user_id {
            return Some(Identity { id, email: None });
        }
        credentials.bearer.as_deref().and_then(|token| self.verify(token))
    }

    async fn profile_for_identity(&self, id: Uuid) -> Option<Profile> {
        self.repo.get_profile(id).await
    }
}
