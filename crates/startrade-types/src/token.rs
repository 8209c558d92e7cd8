//! Bearer token types.
//!
//! A minted token has two halves with different authorities:
//!
//! - the **signed claims** travel inside the wire string and give offline
//!   integrity (who the token was minted for, and when);
//! - the **store row** ([`AuthToken`]) is the live authority on expiry and
//!   revocation. Expiry slides forward on every successful validation and
//!   is never part of the signature.
//!
//! A structurally valid signature says nothing about revocation, so the
//! validator consults the row before trusting any cryptographic check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Identity, TokenId};

/// The persisted row backing a minted token. Exactly one row per token,
/// keyed by the opaque wire string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthToken {
    /// The full wire string as handed to the client.
    pub token: String,
    /// The identity the token authorizes.
    pub identity: Identity,
    /// Display name captured at issuance.
    pub display_name: String,
    pub issued_at: DateTime<Utc>,
    /// Sliding expiry: recomputed to `now + ttl` on every successful
    /// validation.
    pub expires_at: DateTime<Utc>,
    /// Revoked rows never authorize again, signature notwithstanding.
    pub revoked: bool,
}

impl AuthToken {
    /// Whether the row's sliding expiry has passed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// The signed claims embedded in the wire token.
///
/// Deliberately excludes expiry: that lives in the store row and slides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Unique mint identifier (prevents two issuances from colliding even
    /// for the same identity at the same instant).
    pub token_id: TokenId,
    pub identity: Identity,
    pub display_name: String,
    pub issued_at: DateTime<Utc>,
}

/// What `issue` hands back to the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The opaque wire string for the `Authorization: Bearer` header.
    pub token: String,
    pub identity: Identity,
    pub display_name: String,
    pub expires_at: DateTime<Utc>,
}
