//! The single "check session, check role, maybe redirect" sequence used by
//! every protected route and view.
//!
//! Resolution is strictly ordered: identity first, profile only once an
//! identity exists. Each step is bounded by a timeout, and every failure
//! (no session, missing profile, unrecognized role, slow or failing backend)
//! collapses into a redirect instead of an error.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use crate::{
    auth::AuthUser,
    policy::{Capability, can_access_admin_area},
    roles::Role,
    session::{Credentials, SessionResolver},
};

pub const SIGN_IN_PATH: &str = "/admin-login";
pub const UNAUTHORIZED_PATH: &str = "/admin/unauthorized";

/// Redirect
///
/// Where a denied caller is sent. `SignIn` covers "no usable session or role";
/// `Unauthorized` is for a valid back-office user missing one specific capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    SignIn,
    Unauthorized,
}

impl Redirect {
    pub fn location(&self) -> &'static str {
        match self {
            Redirect::SignIn => SIGN_IN_PATH,
            Redirect::Unauthorized => UNAUTHORIZED_PATH,
        }
    }
}

/// resolve_principal
///
/// Runs the minimum-bar check and returns the authenticated back-office user.
pub async fn resolve_principal<R>(
    resolver: &R,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<AuthUser, Redirect>
where
    R: SessionResolver + ?Sized,
{
    let identity = match tokio::time::timeout(timeout, resolver.current_identity(credentials)).await
    {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            tracing::debug!("no session; redirecting to sign-in");
            return Err(Redirect::SignIn);
        }
        Err(_) => {
            tracing::warn!(?timeout, "identity resolution timed out");
            return Err(Redirect::SignIn);
        }
    };

    let profile =
        match tokio::time::timeout(timeout, resolver.profile_for_identity(identity.id)).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::debug!(user_id = %identity.id, "no profile for identity");
                return Err(Redirect::SignIn);
            }
            Err(_) => {
                tracing::warn!(user_id = %identity.id, ?timeout, "profile lookup timed out");
                return Err(Redirect::SignIn);
            }
        };

    let role = match Role::parse(&profile.role) {
        Some(role) if can_access_admin_area(Some(role)) => role,
        _ => {
            tracing::warn!(user_id = %identity.id, "profile carries no recognized role");
            return Err(Redirect::SignIn);
        }
    };

    Ok(AuthUser {
        id: identity.id,
        email: identity.email,
        name: profile.name,
        role,
    })
}

/// authorize
///
/// `resolve_principal` followed by the capability a specific action needs.
pub async fn authorize<R>(
    resolver: &R,
    credentials: &Credentials,
    capability: Capability,
    timeout: Duration,
) -> Result<AuthUser, Redirect>
where
    R: SessionResolver + ?Sized,
{
    let user = resolve_principal(resolver, credentials, timeout).await?;
    user.require(capability)?;
    Ok(user)
}

// --- Client-side view contract ---

/// GuardState
///
/// `Checking` is always the initial state; the other two are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardState {
    Checking,
    Authorized(AuthUser),
    Redirecting(Redirect),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardTransitionError {
    #[error("guard already settled")]
    AlreadySettled,
}

/// Navigation
///
/// Monotonic counter bumped on every navigation. A guard check captures a
/// ticket when it starts; if a newer navigation began meanwhile, its result
/// belongs to a page the user has already left.
#[derive(Debug, Default)]
pub struct Navigation {
    generation: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket(u64);

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> NavigationTicket {
        NavigationTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    Settled(GuardState),
    /// The navigation was replaced before the check finished; nothing was applied.
    Superseded,
}

/// GuardedView
///
/// One protected page or affordance. Renders a loading indicator while
/// `Checking`, its children once `Authorized`, and nothing while `Redirecting`.
#[derive(Debug)]
pub struct GuardedView {
    capability: Capability,
    ticket: NavigationTicket,
    state: GuardState,
}

impl GuardedView {
    pub fn new(capability: Capability, ticket: NavigationTicket) -> Self {
        Self {
            capability,
            ticket,
            state: GuardState::Checking,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn renders_protected_content(&self) -> bool {
        matches!(self.state, GuardState::Authorized(_))
    }

    /// settle
    ///
    /// Applies a guard result. Only allowed once, from `Checking`.
    pub fn settle(
        &mut self,
        result: Result<AuthUser, Redirect>,
    ) -> Result<&GuardState, GuardTransitionError> {
        if self.state != GuardState::Checking {
            return Err(GuardTransitionError::AlreadySettled);
        }
        self.state = match result {
            Ok(user) => GuardState::Authorized(user),
            Err(redirect) => GuardState::Redirecting(redirect),
        };
        Ok(&self.state)
    }

    /// run
    ///
    /// Performs the check and applies it, unless `navigation` moved on while it
    /// was in flight.
    pub async fn run<R>(
        &mut self,
        navigation: &Navigation,
        resolver: &R,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<GuardOutcome, GuardTransitionError>
    where
        R: SessionResolver + ?Sized,
    {
        if self.state != GuardState::Checking {
            return Err(GuardTransitionError::AlreadySettled);
        }

        let result = authorize(resolver, credentials, self.capability, timeout).await;

        if !navigation.is_current(self.ticket) {
            tracing::debug!("discarding guard result for superseded navigation");
            return Ok(GuardOutcome::Superseded);
        }

        let state = self.settle(result)?.clone();
        Ok(GuardOutcome::Settled(state))
    }
}
