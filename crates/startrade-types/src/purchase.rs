//! Purchase batch inputs and outcomes.

use serde::{Deserialize, Serialize};

use crate::{ItemKind, PurchasedItem};

/// One requested line in a buy batch.
///
/// Lines address listings the way the client UI shows them: by item kind
/// plus the seller's display name. Resolution takes the first matching
/// listing in retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurchaseLine {
    pub item: ItemKind,
    pub quantity: u32,
    pub seller_name: String,
}

/// What a settled buy actually delivered.
///
/// Under concurrent contention this can be less than what validation
/// priced: lines lost to a faster buyer are skipped, and `total_cost`
/// reflects only what cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub items: Vec<PurchasedItem>,
    pub total_cost: u64,
}
