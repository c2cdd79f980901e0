//! Password digests.
//!
//! `PasswordHasher` is an explicit handle built at bootstrap and passed to
//! whoever needs to set or check a password. Digests are Argon2id PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so each one carries its
//! own salt and cost parameters.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::debug;

use crate::config::HashingConfig;
use crate::error::RolsaError;

/// Stored digests may ask for at most this multiple of the larger of the
/// configured and the argon2 default cost before verification is refused.
const COST_CEILING_FACTOR: u32 = 4;

/// Upper bounds on the cost parameters a stored digest may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CostCeiling {
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
}

impl CostCeiling {
    fn for_params(params: &Params) -> Self {
        let cap = |configured: u32, default: u32| {
            configured.max(default).saturating_mul(COST_CEILING_FACTOR)
        };
        Self {
            m_cost: cap(params.m_cost(), Params::DEFAULT_M_COST),
            t_cost: cap(params.t_cost(), Params::DEFAULT_T_COST),
            p_cost: cap(params.p_cost(), Params::DEFAULT_P_COST),
        }
    }

    fn admits(&self, params: &Params) -> bool {
        params.m_cost() <= self.m_cost
            && params.t_cost() <= self.t_cost
            && params.p_cost() <= self.p_cost
    }
}

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    ceiling: CostCeiling,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
            ceiling: CostCeiling::for_params(&Params::default()),
        }
    }
}

impl PasswordHasher {
    pub fn from_config(cfg: &HashingConfig) -> Result<Self, RolsaError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| RolsaError::HashParams(e.to_string()))?;
        Ok(Self {
            ceiling: CostCeiling::for_params(&params),
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Salted one-way digest of `raw`.
    pub fn hash(&self, raw: &str) -> Result<String, RolsaError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| RolsaError::validation(format!("password could not be hashed: {e}")))?;
        Ok(digest.to_string())
    }

    /// Constant-time check of `raw` against a stored digest.
    ///
    /// A digest that does not parse, was produced by an algorithm argon2
    /// does not know, or asks for more work than the cost ceiling allows is
    /// treated as a mismatch.
    pub fn verify(&self, raw: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "stored password digest is malformed");
                return false;
            }
        };
        let params = match Params::try_from(&parsed) {
            Ok(params) => params,
            Err(e) => {
                debug!(error = %e, "stored password digest has unusable params");
                return false;
            }
        };
        if !self.ceiling.admits(&params) {
            debug!(
                m_cost = params.m_cost(),
                t_cost = params.t_cost(),
                p_cost = params.p_cost(),
                "stored password digest exceeds the cost ceiling"
            );
            return false;
        }
        match self.argon2.verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                debug!(error = %e, "stored password digest could not be verified");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTILE_MEMORY: &str =
        "$argon2id$v=19$m=268435455,t=1,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNoaGFzaA";
    const HOSTILE_TIME: &str =
        "$argon2id$v=19$m=1024,t=4294967295,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNoaGFzaA";

    fn hasher() -> PasswordHasher {
        PasswordHasher::from_config(&HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid params")
    }

    #[test]
    fn digest_verifies_only_the_original_password() {
        let h = hasher();
        let digest = h.hash("secret123").expect("hash");
        assert_ne!(digest, "secret123");
        assert!(digest.starts_with("$argon2id$"));
        assert!(h.verify("secret123", &digest));
        assert!(!h.verify("wrong", &digest));
        assert!(!h.verify("", &digest));
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let h = hasher();
        let a = h.hash("secret123").expect("hash");
        let b = h.hash("secret123").expect("hash");
        assert_ne!(a, b);
        assert!(h.verify("secret123", &a));
        assert!(h.verify("secret123", &b));
    }

    #[test]
    fn malformed_digests_never_verify() {
        let h = hasher();
        for digest in [
            "",
            "secret123",
            "not-a-hash",
            "$argon2id$v=19$garbage",
            "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW",
            HOSTILE_MEMORY,
            HOSTILE_TIME,
        ] {
            assert!(!h.verify("secret123", digest), "{digest:?} verified");
        }
    }

    #[test]
    fn digests_carry_their_own_params() {
        let digest = hasher().hash("secret123").expect("hash");
        assert!(PasswordHasher::default().verify("secret123", &digest));
    }

    #[test]
    fn ceiling_tracks_the_larger_of_configured_and_default_cost() {
        let small = hasher().ceiling;
        assert_eq!(small.m_cost, Params::DEFAULT_M_COST * COST_CEILING_FACTOR);
        assert_eq!(small.t_cost, Params::DEFAULT_T_COST * COST_CEILING_FACTOR);

        let big = PasswordHasher::from_config(&HashingConfig {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 1,
        })
        .expect("valid params")
        .ceiling;
        assert_eq!(big.m_cost, 65536 * COST_CEILING_FACTOR);
        assert!(big.admits(&Params::new(65536, 3, 1, None).expect("params")));
        assert!(!big.admits(&Params::new(65536 * 5, 3, 1, None).expect("params")));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let cfg = HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(matches!(
            PasswordHasher::from_config(&cfg),
            Err(RolsaError::HashParams(_))
        ));
    }
}
