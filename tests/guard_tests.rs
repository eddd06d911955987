use async_trait::async_trait;
use chrono::Utc;
use gov_portal::{
    auth::AuthUser,
    guard::{
        GuardOutcome, GuardState, GuardTransitionError, GuardedView, Navigation, Redirect,
        authorize, resolve_principal,
    },
    models::Profile,
    policy::Capability,
    roles::Role,
    session::{Credentials, Identity, SessionResolver},
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};
use uuid::Uuid;

const USER_ID: Uuid = Uuid::from_u128(42);
const TIMEOUT: Duration = Duration::from_millis(100);

// --- Stub resolver ---

/// Answers from fixed values, optionally after a delay, and counts profile lookups.
#[derive(Default)]
struct StubResolver {
    identity: Option<Identity>,
    role: Option<String>,
    identity_delay: Option<Duration>,
    profile_delay: Option<Duration>,
    profile_lookups: Arc<AtomicUsize>,
}

impl StubResolver {
    fn signed_in(role: &str) -> Self {
        Self {
            identity: Some(Identity {
                id: USER_ID,
                email: Some("staff@portal.test".to_string()),
            }),
            role: Some(role.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl SessionResolver for StubResolver {
    async fn current_identity(&self, _credentials: &Credentials) -> Option<Identity> {
        if let Some(delay) = self.identity_delay {
            tokio::time::sleep(delay).await;
        }
        self.identity.clone()
    }

    async fn profile_for_identity(&self, id: Uuid) -> Option<Profile> {
        self.profile_lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.profile_delay {
            tokio::time::sleep(delay).await;
        }
        self.role.clone().map(|role| Profile {
            id,
            name: "Staff Member".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

fn credentials() -> Credentials {
    Credentials {
        bearer: Some("token".to_string()),
        dev_user_id: None,
    }
}

// --- resolve_principal / authorize ---

#[tokio::test]
async fn test_recognized_roles_pass_the_minimum_bar() {
    for (raw, role) in [
        ("owner", Role::Owner),
        ("admin", Role::Admin),
        ("moderator", Role::Moderator),
    ] {
        let resolver = StubResolver::signed_in(raw);
        let user = resolve_principal(&resolver, &credentials(), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(user.role, role);
        assert_eq!(user.id, USER_ID);
    }
}

#[tokio::test]
async fn test_unrecognized_role_redirects_to_sign_in_not_unauthorized() {
    for raw in ["", "superadmin"] {
        let resolver = StubResolver::signed_in(raw);
        for capability in [
            Capability::AccessAdminArea,
            Capability::EditContent,
            Capability::ManageUsers,
        ] {
            let result = authorize(&resolver, &credentials(), capability, TIMEOUT).await;
            assert_eq!(result, Err(Redirect::SignIn), "{raw:?} / {capability:?}");
        }
    }
}

#[tokio::test]
async fn test_no_identity_redirects_and_skips_profile_lookup() {
    // A role is available, but without an identity it must never be consulted.
    let resolver = StubResolver {
        role: Some("owner".to_string()),
        ..StubResolver::default()
    };
    let result = resolve_principal(&resolver, &Credentials::default(), TIMEOUT).await;

    assert_eq!(result, Err(Redirect::SignIn));
    assert_eq!(resolver.profile_lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_profile_redirects_to_sign_in() {
    let resolver = StubResolver {
        role: None,
        ..StubResolver::signed_in("admin")
    };
    let result = resolve_principal(&resolver, &credentials(), TIMEOUT).await;
    assert_eq!(result, Err(Redirect::SignIn));
}

#[tokio::test]
async fn test_missing_capability_redirects_to_unauthorized() {
    let resolver = StubResolver::signed_in("moderator");

    let edit = authorize(&resolver, &credentials(), Capability::EditContent, TIMEOUT).await;
    assert_eq!(edit, Err(Redirect::Unauthorized));

    let users = authorize(&resolver, &credentials(), Capability::ManageUsers, TIMEOUT).await;
    assert_eq!(users, Err(Redirect::Unauthorized));

    let view = authorize(
        &resolver,
        &credentials(),
        Capability::AccessAdminArea,
        TIMEOUT,
    )
    .await;
    assert!(view.is_ok());
}

#[tokio::test]
async fn test_slow_profile_lookup_times_out_to_sign_in() {
    let resolver = StubResolver {
        profile_delay: Some(Duration::from_secs(30)),
        ..StubResolver::signed_in("owner")
    };

    let started = Instant::now();
    let result = resolve_principal(&resolver, &credentials(), TIMEOUT).await;

    assert_eq!(result, Err(Redirect::SignIn));
    assert!(started.elapsed() < Duration::from_secs(5), "guard must not hang");
}

#[tokio::test]
async fn test_slow_identity_lookup_times_out_to_sign_in() {
    let resolver = StubResolver {
        identity_delay: Some(Duration::from_secs(30)),
        ..StubResolver::signed_in("owner")
    };

    let started = Instant::now();
    let result = resolve_principal(&resolver, &credentials(), TIMEOUT).await;

    assert_eq!(result, Err(Redirect::SignIn));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(resolver.profile_lookups.load(Ordering::SeqCst), 0);
}

// --- GuardedView state machine ---

#[tokio::test]
async fn test_view_starts_checking_and_hides_content() {
    let navigation = Navigation::new();
    let view = GuardedView::new(Capability::AccessAdminArea, navigation.begin());

    assert_eq!(view.state(), &GuardState::Checking);
    assert!(!view.renders_protected_content());
}

#[tokio::test]
async fn test_view_authorizes_then_renders() {
    let navigation = Navigation::new();
    let mut view = GuardedView::new(Capability::EditContent, navigation.begin());
    let resolver = StubResolver::signed_in("admin");

    let outcome = view
        .run(&navigation, &resolver, &credentials(), TIMEOUT)
        .await
        .unwrap();

    match outcome {
        GuardOutcome::Settled(GuardState::Authorized(user)) => assert_eq!(user.role, Role::Admin),
        other => panic!("expected authorized, got {other:?}"),
    }
    assert!(view.renders_protected_content());
}

#[tokio::test]
async fn test_view_redirect_never_renders_content() {
    let navigation = Navigation::new();
    let mut view = GuardedView::new(Capability::DeleteContent, navigation.begin());
    let resolver = StubResolver::signed_in("moderator");

    let outcome = view
        .run(&navigation, &resolver, &credentials(), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        GuardOutcome::Settled(GuardState::Redirecting(Redirect::Unauthorized))
    );
    assert!(!view.renders_protected_content());
}

#[tokio::test]
async fn test_view_settles_only_once() {
    let navigation = Navigation::new();
    let mut view = GuardedView::new(Capability::AccessAdminArea, navigation.begin());

    view.settle(Err(Redirect::SignIn)).unwrap();
    let user = AuthUser {
        id: USER_ID,
        email: None,
        name: "Late".to_string(),
        role: Role::Owner,
    };
    assert_eq!(
        view.settle(Ok(user)),
        Err(GuardTransitionError::AlreadySettled)
    );
    assert_eq!(view.state(), &GuardState::Redirecting(Redirect::SignIn));

    let resolver = StubResolver::signed_in("owner");
    let rerun = view
        .run(&navigation, &resolver, &credentials(), TIMEOUT)
        .await;
    assert_eq!(rerun, Err(GuardTransitionError::AlreadySettled));
}

#[tokio::test]
async fn test_superseded_navigation_discards_result() {
    let navigation = Navigation::new();
    let mut stale = GuardedView::new(Capability::AccessAdminArea, navigation.begin());
    let current_ticket = navigation.begin();

    let resolver = StubResolver::signed_in("owner");
    let outcome = stale
        .run(&navigation, &resolver, &credentials(), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(outcome, GuardOutcome::Superseded);
    assert_eq!(stale.state(), &GuardState::Checking);
    assert!(!stale.renders_protected_content());
    assert!(navigation.is_current(current_ticket));
}

#[tokio::test]
async fn test_navigation_during_slow_check_is_superseded() {
    let navigation = Arc::new(Navigation::new());
    let resolver = Arc::new(StubResolver {
        profile_delay: Some(Duration::from_millis(50)),
        ..StubResolver::signed_in("owner")
    });

    let mut view = GuardedView::new(Capability::AccessAdminArea, navigation.begin());
    let check = {
        let navigation = navigation.clone();
        let resolver = resolver.clone();
        tokio::spawn(async move {
            let outcome = view
                .run(&navigation, resolver.as_ref(), &credentials(), Duration::from_secs(5))
                .await;
            (outcome, view)
        })
    };

    // The user navigates away while the profile lookup is still in flight.
    tokio::time::sleep(Duration::from_millis(10)).await;
    navigation.begin();

    let (outcome, view) = check.await.unwrap();
    assert_eq!(outcome, Ok(GuardOutcome::Superseded));
    assert_eq!(view.state(), &GuardState::Checking);
}
