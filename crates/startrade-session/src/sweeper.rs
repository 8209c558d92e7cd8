//! The reconciliation sweeper.
//!
//! One pass retires three kinds of stale lifecycle state, each in its own
//! transaction so a failing sub-step cannot drag the others down:
//!
//! 1. token rows whose expiry has passed;
//! 2. open sessions idle beyond the session threshold;
//! 3. presence records idle beyond the presence threshold, together with
//!    every token those identities still hold.
//!
//! The background loop reschedules unconditionally — sweep errors are
//! logged and swallowed, never surfaced, never fatal. Cancellation is
//! cooperative and can only land between passes: each sub-step runs
//! synchronously under the store lock, so shutdown never leaves one
//! half-applied.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use startrade_store::Store;
use startrade_types::SweepConfig;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// What one sweep pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired_tokens: usize,
    pub closed_sessions: usize,
    pub removed_identities: usize,
}

impl SweepReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expired_tokens == 0 && self.closed_sessions == 0 && self.removed_identities == 0
    }
}

/// Periodic reconciliation over tokens, sessions, and presence records.
#[derive(Debug, Clone)]
pub struct Sweeper {
    store: Arc<Store>,
    config: SweepConfig,
}

impl Sweeper {
    #[must_use]
    pub fn new(store: Arc<Store>, config: SweepConfig) -> Self {
        Self { store, config }
    }

    /// Run one reconciliation pass. Also serves as the synchronous
    /// administrative cleanup operation — same logic, same code.
    pub fn sweep_once(&self) -> SweepReport {
        let now = Utc::now();
        let mut report = SweepReport::default();

        match self.store.write(|state| Ok(state.remove_expired_tokens(now))) {
            Ok(count) => report.expired_tokens = count,
            Err(err) => warn!(%err, "sweep: expired-token pass failed"),
        }

        let idle = self.config.session_idle();
        match self.store.write(|state| Ok(state.close_idle_sessions(now, idle))) {
            Ok(count) => report.closed_sessions = count,
            Err(err) => warn!(%err, "sweep: idle-session pass failed"),
        }

        let cutoff = now - self.config.presence_idle();
        match self.store.write(|state| {
            let stale = state.stale_presence(cutoff);
            for identity in &stale {
                state.remove_tokens_of(identity);
                state.remove_presence(identity);
            }
            Ok(stale.len())
        }) {
            Ok(count) => report.removed_identities = count,
            Err(err) => warn!(%err, "sweep: stale-presence pass failed"),
        }

        if report.is_empty() {
            debug!("sweep pass: nothing to reconcile");
        } else {
            info!(
                expired_tokens = report.expired_tokens,
                closed_sessions = report.closed_sessions,
                removed_identities = report.removed_identities,
                "sweep pass complete"
            );
        }
        report
    }

    /// The background loop. Sweeps immediately, then on every interval
    /// tick, until the shutdown channel fires (or its sender drops).
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = self.config.interval_secs, "sweeper started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.sweep_once();
                }
                _ = shutdown.changed() => {
                    info!("sweeper shutting down");
                    break;
                }
            }
        }
    }
}
