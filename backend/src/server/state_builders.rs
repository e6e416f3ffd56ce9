//! Builders for HTTP state ports and repository-backed services.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use recruitment::domain::ports::{
    ApplicationRepository, PasswordHasher, ProfileRepository, UserRepository,
};
use recruitment::domain::{AccountService, ApplicationService, ProfileService, TokenService};
use recruitment::inbound::http::state::{HttpState, HttpStatePorts};
use recruitment::outbound::memory::{
    InMemoryApplicationRepository, InMemoryProfileRepository, InMemoryUserRepository,
};
use recruitment::outbound::persistence::{
    DieselApplicationRepository, DieselProfileRepository, DieselUserRepository,
};
use recruitment::outbound::security::BcryptPasswordHasher;

use super::ServerConfig;

/// Repositories behind the driving ports, grouped so the Diesel and
/// in-memory branches share one assembly path.
struct Repositories<U, P, A> {
    users: Arc<U>,
    profiles: Arc<P>,
    applications: Arc<A>,
}

/// Wrap repositories in their services and cast them to the port objects
/// held by [`HttpState`].
fn assemble_ports<U, P, A, H>(
    repos: Repositories<U, P, A>,
    hasher: Arc<H>,
    tokens: &TokenService,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    H: PasswordHasher + 'static,
{
    let Repositories {
        users,
        profiles,
        applications,
    } = repos;
    let profile = Arc::new(ProfileService::new(profiles));
    let applications = Arc::new(ApplicationService::new(applications, clock));
    HttpStatePorts {
        auth: Arc::new(AccountService::new(users, hasher, tokens.clone())),
        profile: profile.clone(),
        profile_query: profile,
        applications: applications.clone(),
        applications_query: applications,
    }
}

/// Build the shared HTTP state from the configured pool, falling back to
/// in-memory repositories when no database is configured.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the configured bcrypt cost is rejected.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = TokenService::new(config.token_signer.clone(), clock.clone(), config.ttls);
    let hasher = Arc::new(
        BcryptPasswordHasher::new(config.bcrypt_cost)
            .map_err(|err| std::io::Error::other(format!("invalid bcrypt cost: {err}")))?,
    );

    let ports = match &config.db_pool {
        Some(pool) => assemble_ports(
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
                applications: Arc::new(DieselApplicationRepository::new(pool.clone())),
            },
            hasher,
            &tokens,
            clock,
        ),
        None => assemble_ports(
            Repositories {
                users: Arc::new(InMemoryUserRepository::default()),
                profiles: Arc::new(InMemoryProfileRepository::default()),
                applications: Arc::new(InMemoryApplicationRepository::default()),
            },
            hasher,
            &tokens,
            clock,
        ),
    };

    Ok(web::Data::new(HttpState::new(ports, tokens)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use recruitment::domain::ports::FixtureTokenSigner;
    use recruitment::domain::{
        Caller, Competence, CompetenceTypeId, ErrorCode, LoginCredentials, Registration,
        RegistrationInput, Role, SessionSubject, TokenKind, TokenTtls, YearsOfExperience,
    };
    use recruitment::test_support::MutableClock;
    use rstest::rstest;

    fn config() -> ServerConfig {
        ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket address"),
            Arc::new(FixtureTokenSigner),
        )
        .with_bcrypt_cost(BcryptPasswordHasher::MIN_COST)
    }

    fn registration() -> Registration {
        Registration::try_from_input(RegistrationInput {
            name: "Ada",
            surname: "Lovelace",
            national_id: "19900115-1234",
            username: "ada",
            email: "ada@example.com",
            password: "correct horse",
        })
        .expect("valid registration")
    }

    #[rstest]
    #[tokio::test]
    async fn pool_absent_falls_back_to_working_in_memory_repositories() {
        let state = build_http_state(&config()).expect("state");

        let identity = state.auth.register(registration()).await.expect("register");
        let credentials =
            LoginCredentials::try_from_parts("ada@example.com", "correct horse")
                .expect("credentials");
        let session = state.auth.login(&credentials).await.expect("login");
        assert_eq!(session.user.id, identity.id);

        let duplicate = state
            .auth
            .register(registration())
            .await
            .err()
            .expect("second registration conflicts");
        assert_eq!(duplicate.code(), ErrorCode::Conflict);

        let caller = Caller::from(
            &state
                .tokens
                .verify(&session.tokens.access.token, TokenKind::Access)
                .expect("access token"),
        );
        let desired = vec![
            Competence::new(
                CompetenceTypeId::new(2).expect("type id"),
                YearsOfExperience::new(3.0).expect("years"),
            ),
            Competence::new(
                CompetenceTypeId::new(1).expect("type id"),
                YearsOfExperience::new(5.0).expect("years"),
            ),
        ];
        state
            .profile
            .save_competences(Some(caller.clone()), Some(identity.id), desired)
            .await
            .expect("save");
        let stored = state
            .profile_query
            .competences(Some(caller), Some(identity.id))
            .await
            .expect("read back");
        let types: Vec<i32> = stored
            .iter()
            .map(|c| c.competence_type_id.get())
            .collect();
        assert_eq!(types, vec![1, 2]);
    }

    #[rstest]
    fn configured_ttls_reach_the_token_service() {
        let ttls = TokenTtls::from_secs(60, 120);
        let state = build_http_state(&config().with_token_ttls(ttls)).expect("state");
        assert_eq!(state.tokens.ttls(), ttls);
    }

    #[rstest]
    fn invalid_bcrypt_cost_is_rejected() {
        let err = build_http_state(&config().with_bcrypt_cost(99))
            .err()
            .expect("cost out of range");
        assert!(err.to_string().contains("bcrypt"));
    }

    #[rstest]
    #[tokio::test]
    async fn assembled_ports_share_one_store() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).single().expect("valid time");
        let clock: Arc<dyn Clock> = Arc::new(MutableClock::new(now));
        let tokens = TokenService::new(
            Arc::new(FixtureTokenSigner),
            clock.clone(),
            TokenTtls::default(),
        );
        let ports = assemble_ports(
            Repositories {
                users: Arc::new(InMemoryUserRepository::default()),
                profiles: Arc::new(InMemoryProfileRepository::default()),
                applications: Arc::new(InMemoryApplicationRepository::default()),
            },
            Arc::new(BcryptPasswordHasher::new(BcryptPasswordHasher::MIN_COST).expect("cost")),
            &tokens,
            clock,
        );

        let identity = ports.auth.register(registration()).await.expect("register");
        let subject = SessionSubject::from(&identity);
        let issued = tokens.issue(&subject, TokenKind::Access).expect("issue");
        let claims = tokens.verify(&issued.token, TokenKind::Access).expect("verify");
        assert_eq!(claims.role, Role::Applicant);

        let caller = Caller::from(&claims);
        let competence = Competence::new(
            CompetenceTypeId::new(1).expect("type id"),
            YearsOfExperience::new(5.0).expect("years"),
        );
        ports
            .profile
            .save_competences(Some(caller.clone()), Some(identity.id), vec![competence])
            .await
            .expect("save");
        let stored = ports
            .profile_query
            .competences(Some(caller), Some(identity.id))
            .await
            .expect("read back");
        assert_eq!(stored.len(), 1);
    }
}
