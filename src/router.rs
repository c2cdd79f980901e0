use axum::{Router, routing::get};

use crate::credential::PasswordHasher;
use crate::db::Storage;
use crate::handlers::home::home_handler;

/// Handles shared by request handlers, owned by the bootstrap layer.
#[derive(Clone)]
pub struct RolsaState {
    pub storage: Storage,
    pub hasher: PasswordHasher,
}

impl RolsaState {
    pub fn new(storage: Storage, hasher: PasswordHasher) -> Self {
        Self { storage, hasher }
    }
}

pub fn rolsa_router(state: RolsaState) -> Router {
    Router::new().route("/", get(home_handler)).with_state(state)
}
