//! Admin gate.
//!
//! Admin access is a capability check: whoever presents the shared secret
//! is admin. There is no identity and no revocation. Callers only see the
//! [`AuthGate`] trait so a real identity provider can replace it.

use crate::error::{CalError, CalResult};

pub trait AuthGate {
    /// `Ok(true)` if `secret` grants admin access.
    fn verify(&self, secret: &str) -> CalResult<bool>;
}

/// Compares against a single configured secret.
pub struct SharedSecretGate {
    secret: Option<String>,
}

impl SharedSecretGate {
    pub fn new(secret: Option<String>) -> Self {
        SharedSecretGate {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }
}

impl AuthGate for SharedSecretGate {
    fn verify(&self, secret: &str) -> CalResult<bool> {
        let expected = self.secret.as_deref().ok_or_else(|| {
            CalError::Config("admin_secret is not set in the config file".into())
        })?;

        // Constant-time over equal-length inputs.
        let matches = expected.len() == secret.len()
            && expected
                .bytes()
                .zip(secret.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0;

        Ok(matches)
    }
}
