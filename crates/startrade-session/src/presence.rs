//! Presence session windows.
//!
//! The tracker owns session boundaries: it opens a window at login and
//! closes windows at logout (the sweeper closes idle ones through the
//! same store methods). Methods take `&mut StoreState` so callers fold
//! them into their own transactions — opening a session commits or fails
//! together with the token insert it accompanies.

use chrono::{DateTime, Utc};
use startrade_store::StoreState;
use startrade_types::{Identity, PresenceSession, SessionId, SessionPolicy};
use tracing::debug;

/// Opens and closes per-login session windows under an explicit policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceTracker {
    policy: SessionPolicy,
}

impl PresenceTracker {
    #[must_use]
    pub fn new(policy: SessionPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// Open a new session window for a login.
    ///
    /// Under [`SessionPolicy::AllowConcurrent`] prior open windows stay
    /// open. Under [`SessionPolicy::SingleSession`] they are force-closed
    /// first, in the same transaction.
    pub fn open_session(
        &self,
        state: &mut StoreState,
        identity: &Identity,
        display_name: &str,
        client: Option<String>,
        now: DateTime<Utc>,
    ) -> SessionId {
        if self.policy == SessionPolicy::SingleSession {
            let closed = state.close_sessions_of(identity, now);
            if closed > 0 {
                debug!(%identity, closed, "force-closed prior sessions on login");
            }
        }

        let session = PresenceSession {
            id: SessionId::new(),
            identity: identity.clone(),
            display_name: display_name.to_string(),
            started_at: now,
            ended_at: None,
            last_activity: now,
            active: true,
            client,
        };
        let id = session.id;
        state.insert_session(session);
        id
    }

    /// Close every open window of `identity` (logout). Returns how many.
    pub fn close_sessions(
        &self,
        state: &mut StoreState,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> usize {
        state.close_sessions_of(identity, now)
    }
}
