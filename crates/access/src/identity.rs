//! Identity-provider adapter.
//!
//! The external provider is an opaque identity issuer: it verifies a
//! client-supplied assertion and returns a verified email plus an opaque
//! uid. Authorization is entirely out of its hands - that is the
//! resolver's job.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use loanmitra_core::Email;

/// A verified identity, as issued by the external provider.
///
/// Ephemeral: lives in the adapter's stream and in the session, never in
/// the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub verified_email: Email,
    pub external_uid: String,
}

/// Sign-in failures, classified by remediation path.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider was never configured. Surfaced once at adapter
    /// initialization as a warning; interactive sign-ins report it too.
    #[error("identity provider is not configured")]
    NotConfigured,

    /// The provider rejected the assertion.
    #[error("identity assertion was rejected")]
    Rejected,

    /// Transport or provider-internal failure.
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl IdentityError {
    /// Human-readable message; the three variants need different
    /// remediation (contact IT vs. retry) so they must not collapse into
    /// one generic string.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotConfigured => "Sign-in is not set up for this deployment. Contact IT.",
            Self::Rejected => "We could not verify this account. Check the address and try again.",
            Self::Provider(_) => "Sign-in failed. Please try again in a moment.",
        }
    }
}

/// The external provider boundary.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a client-supplied assertion and return the identity.
    async fn sign_in(&self, assertion: &str) -> Result<Identity, IdentityError>;
}

/// Development provider: accepts `email` or `email:uid` assertions.
///
/// Never deploy outside local development; it performs no verification
/// beyond email syntax.
pub struct DevIdentityProvider;

#[async_trait]
impl IdentityProvider for DevIdentityProvider {
    async fn sign_in(&self, assertion: &str) -> Result<Identity, IdentityError> {
        let (email, uid) = match assertion.split_once(':') {
            Some((email, uid)) => (email, uid),
            None => (assertion, "dev"),
        };
        let verified_email = Email::parse(email).map_err(|_| IdentityError::Rejected)?;
        Ok(Identity {
            verified_email,
            external_uid: uid.to_owned(),
        })
    }
}

/// Process-wide auth-state hub.
///
/// Owns the provider and broadcasts the current identity over a watch
/// channel, so components observe sign-in state through one injected
/// dependency instead of each re-subscribing to the provider.
pub struct IdentityHub {
    provider: Option<Arc<dyn IdentityProvider>>,
    tx: watch::Sender<Option<Identity>>,
}

impl IdentityHub {
    /// Create the hub. A missing provider is a configuration error,
    /// surfaced once here as a non-fatal warning; every subsequent
    /// operation behaves as "no session".
    #[must_use]
    pub fn new(provider: Option<Arc<dyn IdentityProvider>>) -> Self {
        if provider.is_none() {
            tracing::warn!("identity provider not configured; sign-in is disabled");
        }
        let (tx, _) = watch::channel(None);
        Self { provider, tx }
    }

    /// Interactive sign-in. On success the identity is broadcast to all
    /// subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] on a misconfigured provider or a rejected
    /// or failed assertion.
    pub async fn sign_in(&self, assertion: &str) -> Result<Identity, IdentityError> {
        let provider = self.provider.as_ref().ok_or(IdentityError::NotConfigured)?;
        let identity = provider.sign_in(assertion).await?;
        self.tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    /// Clear the current identity.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    /// Subscribe to auth-state changes. The receiver immediately holds the
    /// current value; dropping it unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }

    /// The current identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dev_provider_parses_assertions() {
        let id = DevIdentityProvider.sign_in("asha@x.com:uid-1").await.unwrap();
        assert_eq!(id.verified_email.as_str(), "asha@x.com");
        assert_eq!(id.external_uid, "uid-1");

        let id = DevIdentityProvider.sign_in("asha@x.com").await.unwrap();
        assert_eq!(id.external_uid, "dev");

        assert!(matches!(
            DevIdentityProvider.sign_in("not-an-email").await,
            Err(IdentityError::Rejected)
        ));
    }

    #[tokio::test]
    async fn test_hub_without_provider_fails_closed() {
        let hub = IdentityHub::new(None);
        assert!(matches!(
            hub.sign_in("asha@x.com").await,
            Err(IdentityError::NotConfigured)
        ));
        assert!(hub.current().is_none());
    }

    #[tokio::test]
    async fn test_hub_broadcasts_sign_in_and_out() {
        let hub = IdentityHub::new(Some(Arc::new(DevIdentityProvider)));
        let mut rx = hub.subscribe();
        assert!(rx.borrow().is_none());

        hub.sign_in("asha@x.com").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow().as_ref().map(|i| i.verified_email.as_str().to_owned()),
            Some("asha@x.com".to_owned())
        );

        hub.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
