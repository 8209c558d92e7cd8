//! Error types for the Startrade marketplace core.
//!
//! All errors use the `ST_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Identity gateway errors
//! - 2xx: Token errors
//! - 3xx: Purchase errors
//! - 4xx: Listing management errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{ItemKind, ListingId};

/// Central error enum for all Startrade operations.
#[derive(Debug, Error)]
pub enum StarError {
    // =================================================================
    // Identity Gateway Errors (1xx)
    // =================================================================
    /// Ticket verification failed: the service rejected the ticket, or
    /// transient failures exhausted the retry budget.
    #[error("ST_ERR_100: Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    // =================================================================
    // Token Errors (2xx)
    // =================================================================
    /// The token decodes but no row exists for it in the store.
    #[error("ST_ERR_200: Unknown token")]
    TokenUnknown,

    /// The token's row is marked revoked. A revoked token never validates
    /// again, even with a good signature.
    #[error("ST_ERR_201: Token has been revoked")]
    TokenRevoked,

    /// The token's sliding expiry has passed.
    #[error("ST_ERR_202: Token has expired")]
    TokenExpired,

    /// The token string doesn't parse, or its signature doesn't verify.
    #[error("ST_ERR_203: Malformed token")]
    TokenMalformed,

    // =================================================================
    // Purchase Errors (3xx)
    // =================================================================
    /// A requested line has no matching listing. Rejects the whole batch.
    #[error("ST_ERR_300: Item {item} from {seller_name} is no longer available")]
    ItemUnavailable { item: ItemKind, seller_name: String },

    /// A requested line asks for more than the listing holds.
    #[error(
        "ST_ERR_301: Not enough {item} available: requested {requested}, available {available}"
    )]
    InsufficientStock {
        item: ItemKind,
        requested: u32,
        available: u32,
    },

    /// The batch total exceeds the caller-asserted balance.
    #[error("ST_ERR_302: Not enough silver: required {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    // =================================================================
    // Listing Management Errors (4xx)
    // =================================================================
    /// Positional removal index is out of range for the seller's listings.
    #[error("ST_ERR_400: Invalid listing index {index} (seller has {count})")]
    InvalidIndex { index: usize, count: usize },

    /// No listing with this ID exists, or it isn't owned by the caller.
    #[error("ST_ERR_401: Listing not found: {0}")]
    ListingNotFound(ListingId),

    /// A sell batch contained a zero-quantity draft. Listings hold at
    /// least one unit for as long as the row exists, so such a row could
    /// never be created.
    #[error("ST_ERR_402: Listing quantity must be at least 1 for {item}")]
    InvalidQuantity { item: ItemKind },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("ST_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, StarError>;
