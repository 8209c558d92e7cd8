//! The settlement engine: buy and sell.

use std::sync::Arc;

use chrono::Utc;
use startrade_store::Store;
use startrade_types::{
    EscrowEntry, EscrowId, ListedItem, Listing, ListingDraft, ListingId, PurchaseLine,
    PurchaseOutcome, PurchasedItem, RecordId, Result, StarError, TokenClaims, TradeEvent,
    TransactionRecord,
};
use tracing::{debug, info};

/// Executes purchases and listings against the shared store.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    store: Arc<Store>,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Settle a purchase batch.
    ///
    /// Two phases, two transactions:
    ///
    /// 1. **Validate** — price the whole batch against current listings
    ///    and the caller-asserted balance. Any failure rejects the whole
    ///    batch with nothing applied. The balance is the *caller's claim*;
    ///    no server-held ledger exists to check it against.
    /// 2. **Commit** — re-resolve every line against current state,
    ///    absorbing whatever happened since validation. A line whose
    ///    listing vanished, or no longer covers the request, lost its
    ///    race and is skipped. Cleared lines decrement the listing
    ///    (deleting it at zero), credit the seller's escrow, and land in
    ///    the buyer's single history record.
    ///
    /// The recorded cost is what actually cleared — under contention it
    /// can be below the validated total, and the buyer is not re-checked
    /// against it.
    ///
    /// # Errors
    /// [`StarError::ItemUnavailable`], [`StarError::InsufficientStock`],
    /// [`StarError::InsufficientFunds`] — all from the validate phase.
    pub fn buy(
        &self,
        claims: &TokenClaims,
        lines: &[PurchaseLine],
        asserted_balance: u64,
    ) -> Result<PurchaseOutcome> {
        self.validate_batch(lines, asserted_balance)?;
        let outcome = self.commit_batch(claims, lines)?;

        info!(
            buyer = %claims.identity,
            lines_cleared = outcome.items.len(),
            lines_requested = lines.len(),
            total_cost = outcome.total_cost,
            "purchase settled"
        );
        Ok(outcome)
    }

    /// Validate phase: one read transaction over the whole batch.
    fn validate_batch(&self, lines: &[PurchaseLine], asserted_balance: u64) -> Result<()> {
        self.store.read(|state| {
            let mut total: u64 = 0;
            for line in lines {
                let listing = state
                    .find_listing(&line.item, &line.seller_name)
                    .ok_or_else(|| StarError::ItemUnavailable {
                        item: line.item.clone(),
                        seller_name: line.seller_name.clone(),
                    })?;
                if line.quantity > listing.quantity {
                    return Err(StarError::InsufficientStock {
                        item: line.item.clone(),
                        requested: line.quantity,
                        available: listing.quantity,
                    });
                }
                total += listing.unit_price * u64::from(line.quantity);
            }
            if total > asserted_balance {
                return Err(StarError::InsufficientFunds {
                    needed: total,
                    available: asserted_balance,
                });
            }
            Ok(())
        })
    }

    /// Commit phase: one write transaction that re-resolves every line.
    fn commit_batch(&self, claims: &TokenClaims, lines: &[PurchaseLine]) -> Result<PurchaseOutcome> {
        self.store.write(|state| {
            let now = Utc::now();
            let mut purchased: Vec<PurchasedItem> = Vec::with_capacity(lines.len());
            let mut total: u64 = 0;

            for line in lines {
                let Some(listing) = state.find_listing(&line.item, &line.seller_name).cloned()
                else {
                    debug!(
                        item = %line.item,
                        seller = %line.seller_name,
                        "line skipped: listing gone since validation"
                    );
                    continue;
                };
                if !state.take_from_listing(listing.id, line.quantity) {
                    debug!(
                        item = %line.item,
                        seller = %line.seller_name,
                        requested = line.quantity,
                        "line skipped: stock raced away since validation"
                    );
                    continue;
                }

                let cost = listing.unit_price * u64::from(line.quantity);
                total += cost;
                state.push_escrow(EscrowEntry {
                    id: EscrowId::new(),
                    seller: listing.seller.clone(),
                    buyer_name: claims.display_name.clone(),
                    item: listing.item.clone(),
                    quantity: line.quantity,
                    unit_price: listing.unit_price,
                    total: cost,
                    created_at: now,
                });
                purchased.push(PurchasedItem {
                    item: listing.item,
                    quantity: line.quantity,
                    unit_price: listing.unit_price,
                    seller: listing.seller,
                    seller_name: listing.seller_name,
                    quality: listing.quality,
                });
            }

            state.push_record(TransactionRecord {
                id: RecordId::new(),
                timestamp: now,
                event: TradeEvent::Purchase {
                    buyer: claims.identity.clone(),
                    buyer_name: claims.display_name.clone(),
                    items: purchased.clone(),
                    total_cost: total,
                },
            });
            Ok(PurchaseOutcome {
                items: purchased,
                total_cost: total,
            })
        })
    }

    /// List a batch of items for sale.
    ///
    /// One transaction: a Listing row per draft plus exactly one
    /// aggregated history record for the batch (a listing event — cost
    /// zero by construction).
    ///
    /// # Errors
    /// [`StarError::InvalidQuantity`] when a draft holds zero units —
    /// listings carry at least one unit for as long as they exist.
    pub fn sell(&self, claims: &TokenClaims, drafts: &[ListingDraft]) -> Result<Vec<Listing>> {
        let listed = self.store.write(|state| {
            if let Some(bad) = drafts.iter().find(|d| d.quantity == 0) {
                return Err(StarError::InvalidQuantity {
                    item: bad.item.clone(),
                });
            }

            let now = Utc::now();
            let mut rows = Vec::with_capacity(drafts.len());
            for draft in drafts {
                let row = Listing {
                    id: ListingId::new(),
                    item: draft.item.clone(),
                    quantity: draft.quantity,
                    unit_price: draft.unit_price,
                    seller: claims.identity.clone(),
                    seller_name: claims.display_name.clone(),
                    quality: draft.quality.clone(),
                    listed_at: now,
                };
                state.insert_listing(row.clone());
                rows.push(row);
            }

            state.push_record(TransactionRecord {
                id: RecordId::new(),
                timestamp: now,
                event: TradeEvent::Listing {
                    seller: claims.identity.clone(),
                    seller_name: claims.display_name.clone(),
                    items: rows
                        .iter()
                        .map(|r| ListedItem {
                            item: r.item.clone(),
                            quantity: r.quantity,
                            unit_price: r.unit_price,
                            quality: r.quality.clone(),
                        })
                        .collect(),
                },
            });
            Ok(rows)
        })?;

        info!(
            seller = %claims.identity,
            listed = listed.len(),
            "listing batch recorded"
        );
        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use startrade_types::{Identity, TokenId};

    use super::*;

    fn claims(who: &str, name: &str) -> TokenClaims {
        TokenClaims {
            token_id: TokenId::new(),
            identity: Identity::new(who),
            display_name: name.into(),
            issued_at: Utc::now(),
        }
    }

    fn engine() -> SettlementEngine {
        SettlementEngine::new(Arc::new(Store::new()))
    }

    fn draft(item: &str, quantity: u32, price: u64) -> ListingDraft {
        ListingDraft {
            item: item.into(),
            quantity,
            unit_price: price,
            quality: String::new(),
        }
    }

    fn line(item: &str, quantity: u32, seller_name: &str) -> PurchaseLine {
        PurchaseLine {
            item: item.into(),
            quantity,
            seller_name: seller_name.into(),
        }
    }

    #[test]
    fn sell_creates_rows_and_one_zero_cost_record() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");

        let listed = engine
            .sell(&seller, &[draft("ironKnife", 5, 10), draft("steel", 75, 2)])
            .unwrap();

        assert_eq!(listed.len(), 2);
        engine.store.read(|state| {
            assert_eq!(state.listings().count(), 2);
            let records = state.history_of(&seller.identity);
            assert_eq!(records.len(), 1, "one aggregated record per batch");
            assert_eq!(records[0].event.total_cost(), 0);
        });
    }

    #[test]
    fn duplicate_listings_coexist_without_merging() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");

        engine.sell(&seller, &[draft("steel", 10, 2)]).unwrap();
        engine.sell(&seller, &[draft("steel", 10, 2)]).unwrap();

        engine.store.read(|state| {
            assert_eq!(state.listings_of(&seller.identity).len(), 2);
        });
    }

    #[test]
    fn zero_quantity_draft_rejects_the_whole_batch() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");

        let err = engine
            .sell(&seller, &[draft("steel", 10, 2), draft("wood", 0, 1)])
            .unwrap_err();

        assert!(matches!(err, StarError::InvalidQuantity { .. }));
        engine
            .store
            .read(|state| assert_eq!(state.listings().count(), 0, "nothing applied"));
    }

    #[test]
    fn buy_decrements_credits_escrow_and_records_history() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");
        let buyer = claims("buyer-1", "Bo");
        engine.sell(&seller, &[draft("ironKnife", 5, 10)]).unwrap();

        let outcome = engine
            .buy(&buyer, &[line("ironKnife", 3, "Ana")], 100)
            .unwrap();

        assert_eq!(outcome.total_cost, 30);
        assert_eq!(outcome.items.len(), 1);
        engine.store.read(|state| {
            let remaining = state.find_listing(&"ironKnife".into(), "Ana").unwrap();
            assert_eq!(remaining.quantity, 2);

            let escrow = state.escrow_of(&seller.identity);
            assert_eq!(escrow.len(), 1);
            assert_eq!(escrow[0].total, 30);
            assert_eq!(escrow[0].buyer_name, "Bo");

            let history = state.history_of(&buyer.identity);
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].event.total_cost(), 30);
        });
    }

    #[test]
    fn full_consumption_deletes_the_listing() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");
        let buyer = claims("buyer-1", "Bo");
        engine.sell(&seller, &[draft("ironKnife", 5, 10)]).unwrap();

        engine
            .buy(&buyer, &[line("ironKnife", 5, "Ana")], 100)
            .unwrap();

        engine.store.read(|state| {
            assert!(state.find_listing(&"ironKnife".into(), "Ana").is_none());
        });
    }

    #[test]
    fn missing_listing_rejects_whole_batch() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");
        let buyer = claims("buyer-1", "Bo");
        engine.sell(&seller, &[draft("steel", 10, 2)]).unwrap();

        let err = engine
            .buy(
                &buyer,
                &[line("steel", 1, "Ana"), line("ironKnife", 1, "Ana")],
                100,
            )
            .unwrap_err();

        assert!(matches!(err, StarError::ItemUnavailable { .. }));
        engine.store.read(|state| {
            // First line untouched: validation is all-or-nothing.
            assert_eq!(
                state.find_listing(&"steel".into(), "Ana").unwrap().quantity,
                10
            );
            assert!(state.escrow_of(&seller.identity).is_empty());
            assert!(state.history_of(&buyer.identity).is_empty());
        });
    }

    #[test]
    fn overdrawn_quantity_rejects_whole_batch() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");
        let buyer = claims("buyer-1", "Bo");
        engine.sell(&seller, &[draft("ironKnife", 2, 10)]).unwrap();

        let err = engine
            .buy(&buyer, &[line("ironKnife", 3, "Ana")], 100)
            .unwrap_err();

        assert!(
            matches!(
                err,
                StarError::InsufficientStock {
                    requested: 3,
                    available: 2,
                    ..
                }
            ),
            "got: {err}"
        );
    }

    #[test]
    fn asserted_balance_below_total_rejects_whole_batch() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");
        let buyer = claims("buyer-1", "Bo");
        engine.sell(&seller, &[draft("ironKnife", 5, 10)]).unwrap();

        let err = engine
            .buy(&buyer, &[line("ironKnife", 3, "Ana")], 29)
            .unwrap_err();

        assert!(matches!(
            err,
            StarError::InsufficientFunds {
                needed: 30,
                available: 29
            }
        ));
    }

    #[test]
    fn escrow_total_equals_recorded_cost_across_sellers() {
        let engine = engine();
        let ana = claims("seller-1", "Ana");
        let cid = claims("seller-2", "Cid");
        let buyer = claims("buyer-1", "Bo");
        engine.sell(&ana, &[draft("ironKnife", 5, 10)]).unwrap();
        engine.sell(&cid, &[draft("steel", 75, 2)]).unwrap();

        let outcome = engine
            .buy(
                &buyer,
                &[line("ironKnife", 2, "Ana"), line("steel", 30, "Cid")],
                1000,
            )
            .unwrap();

        assert_eq!(outcome.total_cost, 2 * 10 + 30 * 2);
        engine.store.read(|state| {
            let escrowed: u64 = state
                .escrow_of(&ana.identity)
                .iter()
                .chain(state.escrow_of(&cid.identity).iter())
                .map(|e| e.total)
                .sum();
            assert_eq!(escrowed, outcome.total_cost);
        });
    }

    #[test]
    fn commit_skips_a_line_whose_listing_vanished() {
        // Deterministic replay of the race window: validate sees the
        // listing, a rival settles in between, commit re-resolves and
        // skips.
        let engine = engine();
        let seller = claims("seller-1", "Ana");
        let rival = claims("buyer-1", "Fast");
        let buyer = claims("buyer-2", "Slow");
        engine
            .sell(&seller, &[draft("ironKnife", 2, 10), draft("steel", 5, 2)])
            .unwrap();

        let batch = [line("ironKnife", 2, "Ana"), line("steel", 5, "Ana")];
        engine.validate_batch(&batch, 100).unwrap();

        // Rival takes every knife between the two phases.
        engine
            .buy(&rival, &[line("ironKnife", 2, "Ana")], 100)
            .unwrap();

        let outcome = engine.commit_batch(&buyer, &batch).unwrap();

        // Knife line silently skipped; steel cleared. Cost reflects only
        // what cleared.
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].item, "steel");
        assert_eq!(outcome.total_cost, 10);
        engine.store.read(|state| {
            let history = state.history_of(&buyer.identity);
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].event.total_cost(), 10);
        });
    }

    #[test]
    fn commit_skips_a_line_whose_stock_shrank_below_the_request() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");
        let rival = claims("buyer-1", "Fast");
        let buyer = claims("buyer-2", "Slow");
        engine.sell(&seller, &[draft("ironKnife", 3, 10)]).unwrap();

        let batch = [line("ironKnife", 2, "Ana")];
        engine.validate_batch(&batch, 100).unwrap();

        // Rival leaves a single knife — not enough for the pending batch.
        engine
            .buy(&rival, &[line("ironKnife", 2, "Ana")], 100)
            .unwrap();

        let outcome = engine.commit_batch(&buyer, &batch).unwrap();

        assert!(outcome.items.is_empty());
        assert_eq!(outcome.total_cost, 0);
        engine.store.read(|state| {
            // The survivor keeps its last unit; nothing went negative.
            assert_eq!(
                state
                    .find_listing(&"ironKnife".into(), "Ana")
                    .unwrap()
                    .quantity,
                1
            );
        });
    }

    #[test]
    fn concurrent_buyers_of_the_last_unit_produce_one_winner() {
        let engine = engine();
        let seller = claims("seller-1", "Ana");
        engine.sell(&seller, &[draft("ironKnife", 1, 10)]).unwrap();

        let mut handles = Vec::new();
        for who in ["buyer-1", "buyer-2"] {
            let engine = engine.clone();
            let buyer = claims(who, who);
            handles.push(std::thread::spawn(move || {
                engine.buy(&buyer, &[line("ironKnife", 1, "Ana")], 100)
            }));
        }
        let outcomes: Vec<Result<PurchaseOutcome>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one buyer clears the unit. The other either validated
        // too late (whole-batch rejection) or lost the commit race (empty
        // settlement at zero cost) — both are correct losses.
        let wins = outcomes
            .iter()
            .filter(|r| matches!(r, Ok(o) if o.total_cost == 10))
            .count();
        assert_eq!(wins, 1);
        for outcome in &outcomes {
            match outcome {
                Ok(o) => assert!(o.total_cost == 10 || o.total_cost == 0),
                Err(err) => assert!(matches!(err, StarError::ItemUnavailable { .. })),
            }
        }

        engine.store.read(|state| {
            assert!(state.find_listing(&"ironKnife".into(), "Ana").is_none());
            assert_eq!(state.escrow_of(&seller.identity).len(), 1);
        });
    }
}
