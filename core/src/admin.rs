//! Shared-secret gate in front of the bulk reset.
//!
//! This is a plaintext comparison against a configured string. It is not a
//! security boundary: no hashing, no lockout, no backoff.

use anyhow::{bail, Result};
use log::{info, warn};

pub const DEFAULT_ADMIN_SECRET: &str = "DBreset18";

#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: String,
}

/// Proof that the gate was passed. Only `AdminGate::unlock` creates one.
#[derive(Debug)]
pub struct AdminSession {
    _private: (),
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_SECRET)
    }
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn unlock(&self, input: &str) -> Result<AdminSession> {
        if input == self.secret {
            info!("admin area unlocked");
            Ok(AdminSession { _private: () })
        } else {
            warn!("admin unlock rejected");
            bail!("Incorrect password. Access denied.")
        }
    }
}
