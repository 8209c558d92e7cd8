//! Sale offer types for the Startrade listing store.
//!
//! A [`Listing`] is an offer of `quantity × item` at `unit_price` silver
//! each, owned by a seller. Its standing invariant: `quantity >= 1` for as
//! long as the row exists — full consumption deletes the row rather than
//! zeroing it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Identity, ListingId};

/// Type alias for item kind identifiers (e.g., "ironKnife", "steel").
/// These are the mod's def names and are compared verbatim.
pub type ItemKind = String;

/// An active sale offer.
///
/// Duplicate (seller, item, quality) rows are permitted and coexist —
/// listing the same thing twice makes two rows, never a merge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Stable identifier; the durable reference for removal.
    pub id: ListingId,
    /// What is being sold.
    pub item: ItemKind,
    /// Units remaining. Always >= 1 while the row exists.
    pub quantity: u32,
    /// Price per unit in silver.
    pub unit_price: u64,
    /// The seller's platform identity.
    pub seller: Identity,
    /// The seller's display name, as shown to buyers (purchase lines
    /// reference listings by this name plus the item kind).
    pub seller_name: String,
    /// Quality tag ("" when the item has no quality).
    pub quality: String,
    /// When the offer was listed.
    pub listed_at: DateTime<Utc>,
}

impl Listing {
    /// Total asking price for the full remaining quantity.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.unit_price * u64::from(self.quantity)
    }
}

/// One item in a sell batch, before it becomes a [`Listing`].
///
/// The seller identity and timestamp are filled in by the settlement
/// engine from the caller's token claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingDraft {
    pub item: ItemKind,
    pub quantity: u32,
    pub unit_price: u64,
    #[serde(default)]
    pub quality: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_price_multiplies() {
        let listing = Listing {
            id: ListingId::new(),
            item: "ironKnife".into(),
            quantity: 5,
            unit_price: 10,
            seller: Identity::new("seller-1"),
            seller_name: "Ana".into(),
            quality: "good".into(),
            listed_at: Utc::now(),
        };
        assert_eq!(listing.total_price(), 50);
    }

    #[test]
    fn draft_quality_defaults_empty() {
        let draft: ListingDraft =
            serde_json::from_str(r#"{"item":"steel","quantity":75,"unit_price":2}"#).unwrap();
        assert_eq!(draft.quality, "");
    }

    #[test]
    fn listing_serde_roundtrip() {
        let listing = Listing {
            id: ListingId::new(),
            item: "steel".into(),
            quantity: 75,
            unit_price: 2,
            seller: Identity::new("seller-1"),
            seller_name: "Ana".into(),
            quality: String::new(),
            listed_at: Utc::now(),
        };
        let json = serde_json::to_string(&listing).unwrap();
        let back: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(listing, back);
    }
}
