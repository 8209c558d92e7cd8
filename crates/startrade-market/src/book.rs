//! Listing queries and removal.
//!
//! Removal by stable [`ListingId`] is the primary operation. The
//! positional variant survives only as a compatibility shim for older
//! clients that address listings by their place in the retrieval order —
//! an index is not a stable reference, and concurrent changes can shift
//! what it points at between the client's read and its delete.

use std::sync::Arc;

use startrade_store::Store;
use startrade_types::{Identity, Listing, ListingId, Result, StarError};
use tracing::info;

/// Queries and removes sale offers.
#[derive(Debug, Clone)]
pub struct ListingBook {
    store: Arc<Store>,
}

impl ListingBook {
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Every active listing, in retrieval order.
    #[must_use]
    pub fn for_sale(&self) -> Vec<Listing> {
        self.store.read(|state| state.listings().cloned().collect())
    }

    /// The seller's own listings, in retrieval order.
    #[must_use]
    pub fn of_seller(&self, seller: &Identity) -> Vec<Listing> {
        self.store
            .read(|state| state.listings_of(seller).into_iter().cloned().collect())
    }

    /// Remove one of the seller's listings by its stable ID.
    ///
    /// # Errors
    /// [`StarError::ListingNotFound`] when no such listing exists or it
    /// belongs to someone else (ownership is not leaked to the caller).
    pub fn remove(&self, seller: &Identity, id: ListingId) -> Result<Listing> {
        let removed = self.store.write(|state| {
            let owned = state.listing(id).is_some_and(|l| &l.seller == seller);
            if !owned {
                return Err(StarError::ListingNotFound(id));
            }
            Ok(state
                .remove_listing(id)
                .expect("listing checked above in this transaction"))
        })?;

        info!(%seller, item = %removed.item, "listing removed");
        Ok(removed)
    }

    /// Compatibility shim: remove the listing at `index` within the
    /// seller's retrieval-order listings. Resolves index → ID and
    /// deletes in one transaction, so the shim itself cannot race — but
    /// the index the *client* computed may already be stale.
    ///
    /// # Errors
    /// [`StarError::InvalidIndex`] when the index is out of range.
    pub fn remove_at(&self, seller: &Identity, index: usize) -> Result<Listing> {
        let removed = self.store.write(|state| {
            let mine = state.listings_of(seller);
            let id = mine
                .get(index)
                .map(|listing| listing.id)
                .ok_or(StarError::InvalidIndex {
                    index,
                    count: mine.len(),
                })?;
            Ok(state
                .remove_listing(id)
                .expect("listing fetched above in this transaction"))
        })?;

        info!(%seller, item = %removed.item, index, "listing removed by index");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn seed(store: &Arc<Store>, seller: &Identity, item: &str) -> ListingId {
        let id = ListingId::new();
        store
            .write(|state| {
                state.insert_listing(Listing {
                    id,
                    item: item.into(),
                    quantity: 1,
                    unit_price: 10,
                    seller: seller.clone(),
                    seller_name: "Ana".into(),
                    quality: String::new(),
                    listed_at: Utc::now(),
                });
                Ok(())
            })
            .unwrap();
        id
    }

    #[test]
    fn remove_by_id_is_stable_under_earlier_removals() {
        let store = Arc::new(Store::new());
        let book = ListingBook::new(Arc::clone(&store));
        let seller = Identity::new("seller-1");
        let a = seed(&store, &seller, "a");
        let c_id = seed(&store, &seller, "c");

        // Something else disappears first; the ID still points at "c".
        book.remove(&seller, a).unwrap();
        let removed = book.remove(&seller, c_id).unwrap();

        assert_eq!(removed.item, "c");
    }

    #[test]
    fn index_shim_shifts_under_concurrent_removal() {
        // The race the stable ID exists to fix: the client reads its
        // listings, picks index 1 ("b"), but a removal lands before the
        // delete — and index 1 now names a different row.
        let store = Arc::new(Store::new());
        let book = ListingBook::new(Arc::clone(&store));
        let seller = Identity::new("seller-1");
        seed(&store, &seller, "a");
        seed(&store, &seller, "b");
        seed(&store, &seller, "c");

        let picked_index = 1; // the client meant "b"

        // Concurrent change: "a" goes away, shifting everything left.
        book.remove_at(&seller, 0).unwrap();

        let removed = book.remove_at(&seller, picked_index).unwrap();
        assert_eq!(removed.item, "c", "the index now names the wrong row");
    }

    #[test]
    fn remove_at_rejects_out_of_range_index() {
        let store = Arc::new(Store::new());
        let book = ListingBook::new(Arc::clone(&store));
        let seller = Identity::new("seller-1");
        seed(&store, &seller, "a");

        let err = book.remove_at(&seller, 1).unwrap_err();
        assert!(matches!(err, StarError::InvalidIndex { index: 1, count: 1 }));
    }

    #[test]
    fn remove_rejects_foreign_listings() {
        let store = Arc::new(Store::new());
        let book = ListingBook::new(Arc::clone(&store));
        let ana = Identity::new("seller-1");
        let imp = Identity::new("imposter");
        let id = seed(&store, &ana, "a");

        let err = book.remove(&imp, id).unwrap_err();
        assert!(matches!(err, StarError::ListingNotFound(_)));
        assert_eq!(book.of_seller(&ana).len(), 1, "nothing was removed");
    }

    #[test]
    fn queries_preserve_retrieval_order() {
        let store = Arc::new(Store::new());
        let book = ListingBook::new(Arc::clone(&store));
        let seller = Identity::new("seller-1");
        for item in ["a", "b", "c"] {
            seed(&store, &seller, item);
        }

        let items: Vec<String> = book.of_seller(&seller).into_iter().map(|l| l.item).collect();
        assert_eq!(items, ["a", "b", "c"]);
    }
}
