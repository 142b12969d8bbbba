//! Authentication transport policy.

use crate::{NetError, Result};

/// Policy deciding whether credentials may be sent over a cleartext
/// connection.
///
/// The default refuses cleartext authentication; set
/// `allow_cleartext_auth` to override (a warning is logged when the
/// override takes effect).
#[derive(Debug, Clone, Copy)]
pub struct AuthPolicy {
    /// Require a TLS connection before any credential exchange.
    pub require_tls_for_auth: bool,
    /// Permit cleartext credentials even when TLS is required.
    pub allow_cleartext_auth: bool,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            require_tls_for_auth: true,
            allow_cleartext_auth: false,
        }
    }
}

/// Checks the policy against the current transport state.
///
/// Called by every engine immediately before credentials are put on the
/// wire; nothing is sent when the check fails.
///
/// # Errors
///
/// Returns [`NetError::TlsRequired`] when the connection is plaintext,
/// TLS is required, and the cleartext override is not set.
pub fn ensure_auth_allowed(is_tls: bool, policy: &AuthPolicy) -> Result<()> {
    if is_tls || !policy.require_tls_for_auth {
        return Ok(());
    }
    if policy.allow_cleartext_auth {
        tracing::warn!("authenticating without TLS, allowed by configuration");
        return Ok(());
    }
    Err(NetError::TlsRequired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_cleartext_when_tls_required() {
        let policy = AuthPolicy {
            require_tls_for_auth: true,
            allow_cleartext_auth: false,
        };
        assert!(matches!(
            ensure_auth_allowed(false, &policy),
            Err(NetError::TlsRequired)
        ));
        assert!(ensure_auth_allowed(true, &policy).is_ok());
    }

    #[test]
    fn cleartext_override_wins() {
        let policy = AuthPolicy {
            require_tls_for_auth: true,
            allow_cleartext_auth: true,
        };
        assert!(ensure_auth_allowed(false, &policy).is_ok());
    }

    #[test]
    fn disabled_policy_allows_anything() {
        let policy = AuthPolicy {
            require_tls_for_auth: false,
            allow_cleartext_auth: false,
        };
        assert!(ensure_auth_allowed(false, &policy).is_ok());
    }
}
