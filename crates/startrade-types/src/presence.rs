//! Presence types: who is around, and their session windows.
//!
//! Two entities with different grains:
//!
//! - [`PresenceRecord`] — one row per identity, upserted on every issuance
//!   and validation. The sweeper retires records idle past the presence
//!   threshold along with all of the identity's tokens.
//! - [`PresenceSession`] — one row per login window. An identity may hold
//!   several concurrently; whether that is allowed is an explicit policy
//!   ([`SessionPolicy`]), not an accident of the login path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Identity, SessionId};

/// Per-identity last-seen marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresenceRecord {
    pub identity: Identity,
    pub display_name: String,
    pub last_seen: DateTime<Utc>,
}

/// One login window: open from `started_at` until logout or the sweeper
/// closes it for idleness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresenceSession {
    pub id: SessionId,
    pub identity: Identity,
    pub display_name: String,
    pub started_at: DateTime<Utc>,
    /// Set when the session closes; `None` while it is open.
    pub ended_at: Option<DateTime<Utc>>,
    pub last_activity: DateTime<Utc>,
    pub active: bool,
    /// Client descriptor (user agent or mod version), when the caller
    /// supplied one.
    pub client: Option<String>,
}

impl PresenceSession {
    /// Whether the session has sat idle longer than `threshold` at `now`.
    #[must_use]
    pub fn idle_longer_than(&self, now: DateTime<Utc>, threshold: chrono::Duration) -> bool {
        now - self.last_activity > threshold
    }
}

/// What to do when an identity that already has an open session logs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionPolicy {
    /// Always open a new session; prior open sessions stay open. This is
    /// the historical behavior of the service.
    #[default]
    AllowConcurrent,
    /// Force-close the identity's open sessions before opening the new one.
    SingleSession,
}
