//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::TokenService;
use crate::domain::ports::{
    ApplicationCommand, ApplicationQuery, AuthService, ProfileCommand, ProfileQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthService>,
    pub profile: Arc<dyn ProfileCommand>,
    pub profile_query: Arc<dyn ProfileQuery>,
    pub applications: Arc<dyn ApplicationCommand>,
    pub applications_query: Arc<dyn ApplicationQuery>,
}

/// Dependency bundle for HTTP handlers.
///
/// `tokens` verifies bearer tokens in the caller extractor; every other
/// field is a driving port.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub profile: Arc<dyn ProfileCommand>,
    pub profile_query: Arc<dyn ProfileQuery>,
    pub applications: Arc<dyn ApplicationCommand>,
    pub applications_query: Arc<dyn ApplicationQuery>,
    pub tokens: TokenService,
}

impl HttpState {
    /// Construct state from the driving ports and the token verifier.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use recruitment::domain::ports::{
    ///     FixtureApplicationRepository, FixturePasswordHasher, FixtureProfileRepository,
    ///     FixtureTokenSigner, FixtureUserRepository,
    /// };
    /// use recruitment::domain::{
    ///     AccountService, ApplicationService, ProfileService, TokenService, TokenTtls,
    /// };
    /// use recruitment::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let tokens = TokenService::new(
    ///     Arc::new(FixtureTokenSigner),
    ///     Arc::new(DefaultClock),
    ///     TokenTtls::default(),
    /// );
    /// let profile = Arc::new(ProfileService::new(Arc::new(FixtureProfileRepository)));
    /// let applications = Arc::new(ApplicationService::new(
    ///     Arc::new(FixtureApplicationRepository),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         auth: Arc::new(AccountService::new(
    ///             Arc::new(FixtureUserRepository),
    ///             Arc::new(FixturePasswordHasher),
    ///             tokens.clone(),
    ///         )),
    ///         profile: profile.clone(),
    ///         profile_query: profile,
    ///         applications: applications.clone(),
    ///         applications_query: applications,
    ///     },
    ///     tokens,
    /// );
    /// let _ = state.auth.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, tokens: TokenService) -> Self {
        let HttpStatePorts {
            auth,
            profile,
            profile_query,
            applications,
            applications_query,
        } = ports;
        Self {
            auth,
            profile,
            profile_query,
            applications,
            applications_query,
            tokens,
        }
    }
}
