//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use recruitment::domain::TokenTtls;
use recruitment::domain::ports::TokenSigner;
use recruitment::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_signer: Arc<dyn TokenSigner>,
    pub(crate) ttls: TokenTtls,
    pub(crate) bcrypt_cost: u32,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration around the session token signer.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_signer: Arc<dyn TokenSigner>) -> Self {
        Self {
            bind_addr,
            token_signer,
            ttls: TokenTtls::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            db_pool: None,
        }
    }

    /// Override the access and refresh token lifetimes.
    #[must_use]
    pub fn with_token_ttls(mut self, ttls: TokenTtls) -> Self {
        self.ttls = ttls;
        self
    }

    /// Override the bcrypt cost used for new password hashes.
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the server answers from fixture repositories, which is
    /// only useful for local smoke tests.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
