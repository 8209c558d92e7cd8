//! The escrow ledger: pending seller proceeds and their claim.

use std::sync::Arc;

use startrade_store::Store;
use startrade_types::{ClaimOutcome, EscrowEntry, Identity, Result};
use tracing::info;

/// Read and claim pending proceeds.
#[derive(Debug, Clone)]
pub struct EscrowLedger {
    store: Arc<Store>,
}

impl EscrowLedger {
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// The seller's pending entries, oldest first. No side effects.
    #[must_use]
    pub fn pending(&self, seller: &Identity) -> Vec<EscrowEntry> {
        self.store
            .read(|state| state.escrow_of(seller).into_iter().cloned().collect())
    }

    /// Claim everything pending for the seller: one transaction sums and
    /// deletes all entries. Nothing pending is a successful `(0, 0)` —
    /// claim is idempotent on empty state, so clients claim freely.
    pub fn claim(&self, seller: &Identity) -> Result<ClaimOutcome> {
        let outcome = self.store.write(|state| {
            let drained = state.drain_escrow_of(seller);
            Ok(ClaimOutcome {
                total: drained.iter().map(|e| e.total).sum(),
                count: drained.len(),
            })
        })?;

        if outcome.count > 0 {
            info!(
                %seller,
                total = outcome.total,
                entries = outcome.count,
                "escrow claimed"
            );
        }
        Ok(outcome)
    }
}
