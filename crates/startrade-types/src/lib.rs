//! # startrade-types
//!
//! Shared types, errors, and configuration for the **Startrade** marketplace
//! core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Identity`], [`ListingId`], [`EscrowId`], [`RecordId`], [`TokenId`], [`SessionId`]
//! - **Listing model**: [`Listing`], [`ListingDraft`], [`ItemKind`]
//! - **Escrow model**: [`EscrowEntry`], [`ClaimOutcome`]
//! - **History model**: [`TransactionRecord`], [`TradeEvent`], [`PurchasedItem`], [`ListedItem`]
//! - **Purchase model**: [`PurchaseLine`], [`PurchaseOutcome`]
//! - **Token model**: [`AuthToken`], [`TokenClaims`], [`IssuedToken`]
//! - **Presence model**: [`PresenceRecord`], [`PresenceSession`], [`SessionPolicy`]
//! - **Configuration**: [`AuthConfig`], [`GatewayConfig`], [`SweepConfig`]
//! - **Errors**: [`StarError`] with `ST_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod escrow;
pub mod history;
pub mod ids;
pub mod listing;
pub mod presence;
pub mod purchase;
pub mod token;

// Re-export all primary types at crate root for ergonomic imports:
//   use startrade_types::{Listing, EscrowEntry, AuthToken, ...};

pub use config::*;
pub use error::*;
pub use escrow::*;
pub use history::*;
pub use ids::*;
pub use listing::*;
pub use presence::*;
pub use purchase::*;
pub use token::*;

// Constants are accessed via `startrade_types::constants::FOO`
// (not re-exported to avoid name collisions).
