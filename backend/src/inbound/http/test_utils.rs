//! Test helpers for inbound HTTP components.
//!
//! Builds a fully wired [`HttpState`] over the in-memory repositories so
//! handler tests exercise the real services without a database.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{FixturePasswordHasher, FixtureTokenSigner, UserRepository};
use crate::domain::{
    AccountService, ApplicationService, EmailAddress, Identity, NationalId, NewIdentity,
    PasswordHash, PersonName, ProfileService, Role, SessionSubject, TokenKind, TokenService,
    TokenTtls, UserId, Username,
};
use crate::test_support::{
    InMemoryApplicationRepository, InMemoryProfileRepository, InMemoryUserRepository, MutableClock,
};

use super::state::{HttpState, HttpStatePorts};

/// Fixed instant shared by HTTP tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0)
        .single()
        .expect("valid fixture instant")
}

/// Wired state plus handles on the stores behind it.
pub struct TestHarness {
    pub state: HttpState,
    pub users: Arc<InMemoryUserRepository>,
    pub clock: Arc<MutableClock>,
}

impl TestHarness {
    pub fn new(now: DateTime<Utc>) -> Self {
        let clock = Arc::new(MutableClock::new(now));
        let users = Arc::new(InMemoryUserRepository::default());
        let tokens = TokenService::new(
            Arc::new(FixtureTokenSigner),
            clock.clone(),
            TokenTtls::default(),
        );
        let profile = Arc::new(ProfileService::new(Arc::new(
            InMemoryProfileRepository::default(),
        )));
        let applications = Arc::new(ApplicationService::new(
            Arc::new(InMemoryApplicationRepository::default()),
            clock.clone(),
        ));
        let ports = HttpStatePorts {
            auth: Arc::new(AccountService::new(
                users.clone(),
                Arc::new(FixturePasswordHasher),
                tokens.clone(),
            )),
            profile: profile.clone(),
            profile_query: profile,
            applications: applications.clone(),
            applications_query: applications,
        };
        Self {
            state: HttpState::new(ports, tokens),
            users,
            clock,
        }
    }

    /// Store an identity directly and return it with a fresh access token.
    ///
    /// The stored password is `correct horse` under the fixture hasher.
    pub async fn seed_user(&self, username: &str, national_id: &str, role: Role) -> (Identity, String) {
        let identity = NewIdentity {
            id: UserId::random(),
            name: PersonName::for_field("name", "Test").expect("name"),
            surname: PersonName::for_field("surname", "User").expect("surname"),
            national_id: NationalId::new(national_id).expect("national id"),
            username: Username::new(username).expect("username"),
            email: EmailAddress::new(format!("{username}@example.com")).expect("email"),
            password_hash: PasswordHash::new("fixture$correct horse"),
            role,
        };
        let stored = self.users.create(&identity).await.expect("seed user");
        let token = self
            .state
            .tokens
            .issue(&SessionSubject::from(&stored), TokenKind::Access)
            .expect("issue access token")
            .token;
        (stored, token)
    }
}

/// Shorthand for handler tests that only need the state.
pub fn http_state(now: DateTime<Utc>) -> HttpState {
    TestHarness::new(now).state
}
