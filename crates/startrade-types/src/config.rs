//! Configuration types for the Startrade core.
//!
//! Defaults come from `constants` and match the deployed service's
//! historical values. Tests inject small or zero thresholds instead of
//! sleeping.

use serde::{Deserialize, Serialize};

use crate::{constants, SessionPolicy};

/// Token issuance and validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Sliding token TTL in seconds.
    pub token_ttl_secs: u64,
    /// What happens when an identity with an open session logs in again.
    pub session_policy: SessionPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: constants::DEFAULT_TOKEN_TTL_SECS,
            session_policy: SessionPolicy::default(),
        }
    }
}

impl AuthConfig {
    /// The TTL as a `chrono::Duration` for expiry arithmetic.
    #[must_use]
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.token_ttl_secs).unwrap_or(i64::MAX))
    }
}

/// Identity gateway retry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Maximum verification attempts (transient failures retry up to this).
    pub max_attempts: u32,
    /// Fixed pause between attempts, in milliseconds.
    pub retry_pause_ms: u64,
    /// Fixed per-attempt timeout on the external call, in milliseconds.
    pub attempt_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_GATEWAY_MAX_ATTEMPTS,
            retry_pause_ms: constants::DEFAULT_GATEWAY_RETRY_PAUSE_MS,
            attempt_timeout_ms: constants::DEFAULT_GATEWAY_ATTEMPT_TIMEOUT_MS,
        }
    }
}

/// Reconciliation sweeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Seconds between background sweep passes.
    pub interval_secs: u64,
    /// Active sessions idle beyond this many seconds get closed.
    pub session_idle_secs: u64,
    /// Presence records idle beyond this many seconds get deleted, with
    /// all of the identity's tokens.
    pub presence_idle_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: constants::DEFAULT_SWEEP_INTERVAL_SECS,
            session_idle_secs: constants::DEFAULT_SESSION_IDLE_SECS,
            presence_idle_secs: constants::DEFAULT_PRESENCE_IDLE_SECS,
        }
    }
}

impl SweepConfig {
    #[must_use]
    pub fn session_idle(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.session_idle_secs).unwrap_or(i64::MAX))
    }

    #[must_use]
    pub fn presence_idle(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.presence_idle_secs).unwrap_or(i64::MAX))
    }
}
