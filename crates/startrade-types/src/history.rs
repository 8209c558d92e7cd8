//! Append-only transaction history.
//!
//! Every purchase and every listing batch appends exactly one
//! [`TransactionRecord`]. Records are never mutated or deleted — the
//! sweeper has no business here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Identity, ItemKind, RecordId};

/// One purchased line as recorded in the buyer's history.
///
/// Carries the full itemized detail so the client can reconstruct the
/// delivery without further queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurchasedItem {
    pub item: ItemKind,
    pub quantity: u32,
    pub unit_price: u64,
    pub seller: Identity,
    pub seller_name: String,
    pub quality: String,
}

/// One listed item as recorded in the seller's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListedItem {
    pub item: ItemKind,
    pub quantity: u32,
    pub unit_price: u64,
    pub quality: String,
}

/// What a history record describes.
///
/// A listing event has no cost by construction — the variant carries no
/// total, which is how "total cost fixed at zero" is enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TradeEvent {
    /// A buyer's settled purchase batch. `total_cost` is what actually
    /// cleared in the commit phase, which can be less than the validated
    /// total under concurrent contention.
    Purchase {
        buyer: Identity,
        buyer_name: String,
        items: Vec<PurchasedItem>,
        total_cost: u64,
    },
    /// A seller's listing batch.
    Listing {
        seller: Identity,
        seller_name: String,
        items: Vec<ListedItem>,
    },
}

impl TradeEvent {
    /// The cost recorded for this event. Listing events are always zero.
    #[must_use]
    pub fn total_cost(&self) -> u64 {
        match self {
            Self::Purchase { total_cost, .. } => *total_cost,
            Self::Listing { .. } => 0,
        }
    }

    /// The identity the event belongs to (buyer or seller).
    #[must_use]
    pub fn actor(&self) -> &Identity {
        match self {
            Self::Purchase { buyer, .. } => buyer,
            Self::Listing { seller, .. } => seller,
        }
    }
}

/// An immutable history record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub event: TradeEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase_event() -> TradeEvent {
        TradeEvent::Purchase {
            buyer: Identity::new("buyer-1"),
            buyer_name: "Bo".into(),
            items: vec![PurchasedItem {
                item: "ironKnife".into(),
                quantity: 3,
                unit_price: 10,
                seller: Identity::new("seller-1"),
                seller_name: "Ana".into(),
                quality: "good".into(),
            }],
            total_cost: 30,
        }
    }

    #[test]
    fn purchase_cost_is_recorded() {
        assert_eq!(purchase_event().total_cost(), 30);
    }

    #[test]
    fn listing_cost_is_structurally_zero() {
        let event = TradeEvent::Listing {
            seller: Identity::new("seller-1"),
            seller_name: "Ana".into(),
            items: vec![ListedItem {
                item: "steel".into(),
                quantity: 75,
                unit_price: 2,
                quality: String::new(),
            }],
        };
        assert_eq!(event.total_cost(), 0);
    }

    #[test]
    fn actor_matches_variant() {
        assert_eq!(purchase_event().actor(), &Identity::new("buyer-1"));
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = TransactionRecord {
            id: RecordId::new(),
            timestamp: Utc::now(),
            event: purchase_event(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: TransactionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
