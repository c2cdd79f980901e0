//! Runtime configuration.
//!
//! Values come from `Config::default()` and are overridden by `ROLSA_`-prefixed
//! environment variables, using `__` to reach nested sections:
//! `ROLSA_BASIC__DATABASE_URL=sqlite:/var/lib/rolsa.db`.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::error::RolsaError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub hashing: HashingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BasicConfig {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:rolsa.db".to_string(),
            listen_addr: "127.0.0.1:5000".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl Config {
    /// Defaults layered under the process environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("ROLSA_").split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, RolsaError> {
        Ok(figment.extract()?)
    }

    pub fn load() -> Result<Self, RolsaError> {
        Self::from_figment(Self::figment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_database() {
        let cfg = Config::from_figment(Figment::from(Serialized::defaults(Config::default())))
            .expect("defaults should extract");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.basic.database_url, "sqlite:rolsa.db");
        assert_eq!(cfg.hashing.memory_kib, argon2::Params::DEFAULT_M_COST);
    }

    #[test]
    fn nested_keys_override_defaults() {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(("basic.database_url", "sqlite::memory:"))
            .merge(("hashing.iterations", 4));
        let cfg = Config::from_figment(figment).expect("overrides should extract");
        assert_eq!(cfg.basic.database_url, "sqlite::memory:");
        assert_eq!(cfg.hashing.iterations, 4);
        assert_eq!(cfg.basic.loglevel, "info");
    }

    #[test]
    fn wrong_type_is_a_config_error() {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(("hashing.iterations", "many"));
        assert!(matches!(
            Config::from_figment(figment),
            Err(RolsaError::Config(_))
        ));
    }
}
