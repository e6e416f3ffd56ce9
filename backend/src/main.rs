//! Backend entry-point: loads settings, prepares persistence and the token
//! signer, then serves the REST API and OpenAPI docs.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use ortho_config::OrthoConfig;
use rand::RngCore;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use recruitment::inbound::http::health::{HealthState, RepositoryBackend};
use recruitment::outbound::persistence::{DbPool, PoolConfig};
use recruitment::outbound::security::{JwtTokenSigner, MIN_SECRET_BYTES};
use recruitment::settings::AppSettings;
use server::{ServerConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;

    let secret = token_secret(&settings)?;
    let signer = JwtTokenSigner::from_secret(&secret)
        .map_err(|e| io::Error::other(format!("invalid token secret: {e}")))?;

    let mut config = ServerConfig::new(settings.bind_addr()?, Arc::new(signer))
        .with_token_ttls(settings.token_ttls()?)
        .with_bcrypt_cost(settings.bcrypt_cost());

    let backend = match settings.database_url.as_deref() {
        Some(url) => {
            run_migrations(url).await?;
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
                .await
                .map_err(|e| io::Error::other(format!("failed to build database pool: {e}")))?;
            config = config.with_db_pool(pool);
            RepositoryBackend::Postgres
        }
        None => {
            warn!("no database URL configured; data is kept in memory only");
            RepositoryBackend::InMemory
        }
    };

    let health_state = web::Data::new(HealthState::new(backend));
    let bind_addr = config.bind_addr();
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}

/// Read the signing secret, or generate a per-process one in debug builds or
/// when explicitly allowed. Tokens signed with a generated secret do not
/// survive a restart.
fn token_secret(settings: &AppSettings) -> io::Result<Zeroizing<Vec<u8>>> {
    match settings.read_token_secret() {
        Ok(secret) => Ok(secret),
        Err(e) if cfg!(debug_assertions) || settings.allow_ephemeral_secret => {
            let path = settings.token_secret_file();
            warn!(path = %path.display(), error = %e, "using temporary token secret (dev only)");
            let mut secret = Zeroizing::new(vec![0_u8; MIN_SECRET_BYTES * 2]);
            rand::thread_rng().fill_bytes(&mut secret);
            Ok(secret)
        }
        Err(e) => Err(io::Error::new(
            e.kind(),
            format!(
                "failed to read token secret at {}: {e}",
                settings.token_secret_file().display()
            ),
        )),
    }
}

/// Apply pending Diesel migrations over a blocking connection before the
/// async pool is built.
async fn run_migrations(url: &str) -> io::Result<()> {
    let url = url.to_owned();
    let applied = tokio::task::spawn_blocking(move || -> Result<usize, String> {
        let mut conn = PgConnection::establish(&url).map_err(|e| e.to_string())?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| io::Error::other(format!("migration task failed: {e}")))?
    .map_err(|e| io::Error::other(format!("failed to run migrations: {e}")))?;
    info!(applied, "database migrations applied");
    Ok(())
}
