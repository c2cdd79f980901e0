//! Bootstrap: build the handles from `Config` and hand them to the router.

use axum::Router;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::credential::PasswordHasher;
use crate::db::Storage;
use crate::error::RolsaError;
use crate::router::{RolsaState, rolsa_router};

pub const RESET_CONFIRMATION: &str = "Database successfully created!";

/// `RUST_LOG` wins when set, otherwise the configured level.
pub fn init_tracing(loglevel: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(loglevel));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();
}

/// Connect, make sure every table exists, and build the application state.
pub async fn build_state(cfg: &Config) -> Result<RolsaState, RolsaError> {
    let storage = Storage::connect(&cfg.basic.database_url).await?;
    storage.create_all().await?;
    let hasher = PasswordHasher::from_config(&cfg.hashing)?;
    Ok(RolsaState::new(storage, hasher))
}

/// Production factory: state plus the HTTP router.
pub async fn create_app(cfg: &Config) -> Result<Router, RolsaError> {
    let state = build_state(cfg).await?;
    Ok(rolsa_router(state))
}

/// Development factory: wipe the database and recreate the schema.
pub async fn reset_database(cfg: &Config) -> Result<Storage, RolsaError> {
    let storage = Storage::connect(&cfg.basic.database_url).await?;
    storage.drop_all().await?;
    storage.create_all().await?;
    info!(database_url = %cfg.basic.database_url, "schema recreated");
    Ok(storage)
}
