//! Identity gateway: opaque ticket in, stable identity out.
//!
//! The actual verification call belongs to the external identity platform
//! and is not reimplemented here. The gateway owns the retry policy around
//! it: a fixed number of attempts with a fixed pause between them and a
//! fixed per-attempt timeout. Semantic rejection fails immediately;
//! transient failures and timeouts burn an attempt.

use std::future::Future;
use std::time::Duration;

use startrade_types::{constants, GatewayConfig, Identity, Result, StarError};
use tracing::{debug, warn};

/// How a verification attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyFailure {
    /// The service understood the ticket and said no. Never retried.
    Rejected(String),
    /// Transport trouble or an upstream hiccup worth another attempt.
    Transient(String),
}

/// Validates a platform ticket and returns the account identity.
///
/// Implementations wrap the real platform API; tests use in-process
/// fakes. `Send + Sync + 'static` because the gateway is shared across
/// request tasks for the life of the process.
pub trait TicketVerifier: Send + Sync + 'static {
    fn verify(
        &self,
        ticket: &str,
    ) -> impl Future<Output = std::result::Result<Identity, VerifyFailure>> + Send;
}

/// Placeholder verifier type for an unconfigured gateway. Never invoked —
/// the gateway short-circuits to the development fallback identity first.
#[derive(Debug, Clone, Copy)]
pub struct DisabledVerifier;

impl TicketVerifier for DisabledVerifier {
    async fn verify(&self, _ticket: &str) -> std::result::Result<Identity, VerifyFailure> {
        Err(VerifyFailure::Rejected("verifier disabled".to_string()))
    }
}

/// Exchanges tickets for identities, with bounded retry.
#[derive(Debug)]
pub struct IdentityGateway<V> {
    verifier: Option<V>,
    config: GatewayConfig,
}

impl IdentityGateway<DisabledVerifier> {
    /// A gateway with no verification service configured. Every ticket
    /// resolves to [`constants::DEV_FALLBACK_IDENTITY`], loudly.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            verifier: None,
            config: GatewayConfig::default(),
        }
    }
}

impl<V: TicketVerifier> IdentityGateway<V> {
    #[must_use]
    pub fn new(verifier: V, config: GatewayConfig) -> Self {
        Self {
            verifier: Some(verifier),
            config,
        }
    }

    /// Resolve a ticket to a stable identity.
    ///
    /// # Errors
    /// [`StarError::AuthenticationFailed`] when the service rejects the
    /// ticket, or when transient failures exhaust the attempt budget.
    pub async fn resolve(&self, ticket: &str) -> Result<Identity> {
        let Some(verifier) = &self.verifier else {
            warn!(
                identity = constants::DEV_FALLBACK_IDENTITY,
                "ticket verification unconfigured; using development fallback identity"
            );
            return Ok(Identity::new(constants::DEV_FALLBACK_IDENTITY));
        };

        let attempt_timeout = Duration::from_millis(self.config.attempt_timeout_ms);
        let pause = Duration::from_millis(self.config.retry_pause_ms);
        let mut last_failure = String::new();

        for attempt in 1..=self.config.max_attempts {
            match tokio::time::timeout(attempt_timeout, verifier.verify(ticket)).await {
                Ok(Ok(identity)) => {
                    debug!(%identity, attempt, "ticket verified");
                    return Ok(identity);
                }
                Ok(Err(VerifyFailure::Rejected(reason))) => {
                    warn!(%reason, "ticket rejected by verification service");
                    return Err(StarError::AuthenticationFailed { reason });
                }
                Ok(Err(VerifyFailure::Transient(reason))) => {
                    warn!(
                        %reason,
                        attempt,
                        max = self.config.max_attempts,
                        "transient verification failure"
                    );
                    last_failure = reason;
                }
                Err(_) => {
                    warn!(
                        attempt,
                        max = self.config.max_attempts,
                        timeout_ms = self.config.attempt_timeout_ms,
                        "verification attempt timed out"
                    );
                    last_failure = "attempt timed out".to_string();
                }
            }
            if attempt < self.config.max_attempts {
                tokio::time::sleep(pause).await;
            }
        }

        Err(StarError::AuthenticationFailed {
            reason: format!("retries exhausted: {last_failure}"),
        })
    }
}
