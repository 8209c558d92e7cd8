//! # startrade-store
//!
//! The single mutable store behind the marketplace core.
//!
//! ## Architecture
//!
//! [`StoreState`] owns the six persisted collections (listings, escrow,
//! history, tokens, presence records, presence sessions) and exposes the
//! focused accessors and mutators the planes compose. Standing invariants
//! (listing quantity never zero while the row exists, history append-only)
//! are enforced here, at the collection boundary.
//!
//! [`Store`] wraps the state in a lock and exposes closure-shaped
//! transactions: one [`Store::read`] or [`Store::write`] call is one
//! logical transaction. Request handlers and the reconciliation sweeper go
//! through this same interface — there is no other shared mutable state in
//! the process.

pub mod state;
pub mod store;

pub use state::StoreState;
pub use store::Store;
