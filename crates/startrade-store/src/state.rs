//! The six persisted collections and their invariant-preserving accessors.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use startrade_types::{
    AuthToken, EscrowEntry, EscrowId, Identity, ItemKind, Listing, ListingId, PresenceRecord,
    PresenceSession, SessionId, TransactionRecord,
};

/// Everything the core persists.
///
/// `BTreeMap` over UUIDv7 keys iterates in creation order, which is the
/// retrieval order the settlement plane relies on for line resolution and
/// positional removal.
#[derive(Debug, Default)]
pub struct StoreState {
    listings: BTreeMap<ListingId, Listing>,
    escrow: BTreeMap<EscrowId, EscrowEntry>,
    history: Vec<TransactionRecord>,
    /// Keyed by the opaque wire string — exactly one row per token.
    tokens: HashMap<String, AuthToken>,
    presence: HashMap<Identity, PresenceRecord>,
    sessions: BTreeMap<SessionId, PresenceSession>,
}

impl StoreState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------

    pub fn insert_listing(&mut self, listing: Listing) {
        self.listings.insert(listing.id, listing);
    }

    #[must_use]
    pub fn listing(&self, id: ListingId) -> Option<&Listing> {
        self.listings.get(&id)
    }

    /// All listings in retrieval order.
    pub fn listings(&self) -> impl Iterator<Item = &Listing> {
        self.listings.values()
    }

    /// The seller's listings in retrieval order.
    #[must_use]
    pub fn listings_of(&self, seller: &Identity) -> Vec<&Listing> {
        self.listings
            .values()
            .filter(|l| &l.seller == seller)
            .collect()
    }

    /// Resolve a purchase line to the first listing matching
    /// (item kind, seller display name) in retrieval order.
    #[must_use]
    pub fn find_listing(&self, item: &ItemKind, seller_name: &str) -> Option<&Listing> {
        self.listings
            .values()
            .find(|l| &l.item == item && l.seller_name == seller_name)
    }

    pub fn remove_listing(&mut self, id: ListingId) -> Option<Listing> {
        self.listings.remove(&id)
    }

    /// Take `take` units from a listing. Deletes the row when it reaches
    /// zero, so quantity stays >= 1 for as long as the row exists and can
    /// never go negative.
    ///
    /// Returns `false` when the row is missing or holds fewer than `take`
    /// units — the caller lost a race and the line is theirs to skip.
    pub fn take_from_listing(&mut self, id: ListingId, take: u32) -> bool {
        let Some(listing) = self.listings.get_mut(&id) else {
            return false;
        };
        if listing.quantity < take {
            return false;
        }
        listing.quantity -= take;
        if listing.quantity == 0 {
            self.listings.remove(&id);
        }
        true
    }

    // -----------------------------------------------------------------
    // Escrow
    // -----------------------------------------------------------------

    pub fn push_escrow(&mut self, entry: EscrowEntry) {
        self.escrow.insert(entry.id, entry);
    }

    /// The seller's pending entries in creation order.
    #[must_use]
    pub fn escrow_of(&self, seller: &Identity) -> Vec<&EscrowEntry> {
        self.escrow
            .values()
            .filter(|e| &e.seller == seller)
            .collect()
    }

    /// Remove and return all of the seller's pending entries.
    pub fn drain_escrow_of(&mut self, seller: &Identity) -> Vec<EscrowEntry> {
        let ids: Vec<EscrowId> = self
            .escrow
            .values()
            .filter(|e| &e.seller == seller)
            .map(|e| e.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.escrow.remove(&id))
            .collect()
    }

    // -----------------------------------------------------------------
    // History (append-only: no mutation or deletion surface exists)
    // -----------------------------------------------------------------

    pub fn push_record(&mut self, record: TransactionRecord) {
        self.history.push(record);
    }

    pub fn history(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.history.iter()
    }

    /// Records whose event belongs to `identity` (as buyer or seller).
    #[must_use]
    pub fn history_of(&self, identity: &Identity) -> Vec<&TransactionRecord> {
        self.history
            .iter()
            .filter(|r| r.event.actor() == identity)
            .collect()
    }

    // -----------------------------------------------------------------
    // Tokens
    // -----------------------------------------------------------------

    pub fn insert_token(&mut self, row: AuthToken) {
        self.tokens.insert(row.token.clone(), row);
    }

    #[must_use]
    pub fn token(&self, token: &str) -> Option<&AuthToken> {
        self.tokens.get(token)
    }

    pub fn token_mut(&mut self, token: &str) -> Option<&mut AuthToken> {
        self.tokens.get_mut(token)
    }

    /// How many unrevoked tokens the identity still holds. Expiry is not
    /// considered — an expired-but-unrevoked row still pins the presence
    /// record until the sweeper retires it.
    #[must_use]
    pub fn unrevoked_token_count(&self, identity: &Identity) -> usize {
        self.tokens
            .values()
            .filter(|t| &t.identity == identity && !t.revoked)
            .count()
    }

    /// Delete token rows whose expiry has passed. Returns how many.
    pub fn remove_expired_tokens(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|_, t| !t.is_expired(now));
        before - self.tokens.len()
    }

    /// Delete every token row owned by `identity`. Returns how many.
    pub fn remove_tokens_of(&mut self, identity: &Identity) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|_, t| &t.identity != identity);
        before - self.tokens.len()
    }

    // -----------------------------------------------------------------
    // Presence records
    // -----------------------------------------------------------------

    /// Insert or refresh the identity's presence row. The display name is
    /// refreshed too — colonies rename between logins.
    pub fn upsert_presence(&mut self, identity: Identity, display_name: &str, now: DateTime<Utc>) {
        self.presence
            .entry(identity.clone())
            .and_modify(|p| {
                p.display_name = display_name.to_string();
                p.last_seen = now;
            })
            .or_insert_with(|| PresenceRecord {
                identity,
                display_name: display_name.to_string(),
                last_seen: now,
            });
    }

    #[must_use]
    pub fn presence(&self, identity: &Identity) -> Option<&PresenceRecord> {
        self.presence.get(identity)
    }

    /// Refresh `last_seen` if a row exists.
    pub fn touch_presence(&mut self, identity: &Identity, now: DateTime<Utc>) {
        if let Some(record) = self.presence.get_mut(identity) {
            record.last_seen = now;
        }
    }

    pub fn remove_presence(&mut self, identity: &Identity) -> Option<PresenceRecord> {
        self.presence.remove(identity)
    }

    /// Identities whose `last_seen` is older than `cutoff`.
    #[must_use]
    pub fn stale_presence(&self, cutoff: DateTime<Utc>) -> Vec<Identity> {
        self.presence
            .values()
            .filter(|p| p.last_seen < cutoff)
            .map(|p| p.identity.clone())
            .collect()
    }

    // -----------------------------------------------------------------
    // Presence sessions
    // -----------------------------------------------------------------

    pub fn insert_session(&mut self, session: PresenceSession) {
        self.sessions.insert(session.id, session);
    }

    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<&PresenceSession> {
        self.sessions.get(&id)
    }

    /// The identity's sessions, open and closed, in creation order.
    #[must_use]
    pub fn sessions_of(&self, identity: &Identity) -> Vec<&PresenceSession> {
        self.sessions
            .values()
            .filter(|s| &s.identity == identity)
            .collect()
    }

    /// Close every open session of `identity`. Returns how many closed.
    pub fn close_sessions_of(&mut self, identity: &Identity, now: DateTime<Utc>) -> usize {
        let mut closed = 0;
        for session in self.sessions.values_mut() {
            if &session.identity == identity && session.active {
                session.active = false;
                session.ended_at = Some(now);
                closed += 1;
            }
        }
        closed
    }

    /// Close open sessions idle longer than `threshold`. Returns how many.
    pub fn close_idle_sessions(&mut self, now: DateTime<Utc>, threshold: chrono::Duration) -> usize {
        let mut closed = 0;
        for session in self.sessions.values_mut() {
            if session.active && session.idle_longer_than(now, threshold) {
                session.active = false;
                session.ended_at = Some(now);
                closed += 1;
            }
        }
        closed
    }
}
