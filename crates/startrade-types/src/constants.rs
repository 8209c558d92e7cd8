//! System-wide constants for the Startrade marketplace core.

/// Default bearer token time-to-live in seconds (24 hours). The expiry
/// slides forward by this much on every successful validation.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 3600;

/// Default reconciliation sweep interval in seconds (1 hour).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Sessions idle beyond this many seconds are closed by the sweeper (2 hours).
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 2 * 3600;

/// Presence records idle beyond this many seconds are deleted by the
/// sweeper, along with all of the identity's tokens (24 hours).
pub const DEFAULT_PRESENCE_IDLE_SECS: u64 = 24 * 3600;

/// Maximum ticket-verification attempts before surfacing an error.
pub const DEFAULT_GATEWAY_MAX_ATTEMPTS: u32 = 3;

/// Pause between ticket-verification attempts, in milliseconds.
pub const DEFAULT_GATEWAY_RETRY_PAUSE_MS: u64 = 1000;

/// Per-attempt timeout on the external verification call, in milliseconds.
pub const DEFAULT_GATEWAY_ATTEMPT_TIMEOUT_MS: u64 = 10_000;

/// The identity returned by an unconfigured gateway. The `dev:` prefix
/// keeps it distinguishable from real platform identities in logs.
pub const DEV_FALLBACK_IDENTITY: &str = "dev:placeholder-identity";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Startrade";
