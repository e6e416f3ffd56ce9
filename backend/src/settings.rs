//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `RECRUITMENT_*` environment variables, an optional
//! configuration file and command-line flags, in OrthoConfig's usual order
//! of precedence. Unset values fall back to the defaults below.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::TokenTtls;
use crate::outbound::security::MIN_SECRET_BYTES;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_TOKEN_SECRET_FILE: &str = "/var/run/secrets/token_secret";

/// Server, database and credential settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECRUITMENT")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without it the server runs on fixtures.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// File holding the HMAC secret used to sign session tokens.
    pub token_secret_file: Option<PathBuf>,
    /// Allow a random per-process secret when the secret file is missing.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: Option<i64>,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: Option<i64>,
    /// Bcrypt cost factor for new password hashes.
    pub bcrypt_cost: Option<u32>,
}

impl AppSettings {
    /// Parse the configured bind address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw:?}: {err}"),
            )
        })
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn token_secret_file(&self) -> PathBuf {
        self.token_secret_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_SECRET_FILE))
    }

    /// Token lifetimes, each falling back to its default independently.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] unless both lifetimes are
    /// positive and the refresh lifetime is at least the access lifetime.
    pub fn token_ttls(&self) -> io::Result<TokenTtls> {
        let access = self
            .access_ttl_secs
            .unwrap_or(TokenTtls::DEFAULT_ACCESS_SECS);
        let refresh = self
            .refresh_ttl_secs
            .unwrap_or(TokenTtls::DEFAULT_REFRESH_SECS);
        if access <= 0 || refresh < access {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("token lifetimes must satisfy 0 < access ({access}s) <= refresh ({refresh}s)"),
            ));
        }
        Ok(TokenTtls::from_secs(access, refresh))
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST)
    }

    /// Read the token secret from [`Self::token_secret_file`].
    ///
    /// Surrounding whitespace is trimmed so files written with a trailing
    /// newline work.
    ///
    /// # Errors
    ///
    /// Propagates read failures, and returns
    /// [`io::ErrorKind::InvalidData`] when the secret is shorter than
    /// [`MIN_SECRET_BYTES`].
    pub fn read_token_secret(&self) -> io::Result<Zeroizing<Vec<u8>>> {
        let path = self.token_secret_file();
        let raw = Zeroizing::new(std::fs::read(&path)?);
        let secret = Zeroizing::new(raw.trim_ascii().to_vec());
        if secret.len() < MIN_SECRET_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "token secret in {} must be at least {MIN_SECRET_BYTES} bytes",
                    path.display()
                ),
            ));
        }
        Ok(secret)
    }
}
