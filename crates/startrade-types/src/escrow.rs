//! Escrowed seller proceeds awaiting claim.
//!
//! When a purchase line commits, the settlement engine credits the seller
//! with an [`EscrowEntry`] instead of paying out directly — the seller's
//! colony collects the silver later via claim, which deletes all of that
//! seller's entries in one transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EscrowId, Identity, ItemKind};

/// Proceeds owed to a seller from one committed purchase line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EscrowEntry {
    pub id: EscrowId,
    /// The seller owed these proceeds.
    pub seller: Identity,
    /// Display name of the buyer, for the seller's claim report.
    pub buyer_name: String,
    /// What was sold.
    pub item: ItemKind,
    /// Units sold in this line.
    pub quantity: u32,
    /// Price per unit at sale time.
    pub unit_price: u64,
    /// Total proceeds for this line (`unit_price * quantity`).
    pub total: u64,
    /// When the purchase line committed.
    pub created_at: DateTime<Utc>,
}

/// Result of claiming pending proceeds.
///
/// Claiming with nothing pending is a successful no-op `(0, 0)` — never an
/// error — so the client can claim unconditionally on login.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ClaimOutcome {
    /// Silver paid out.
    pub total: u64,
    /// Number of escrow entries consumed.
    pub count: usize,
}
