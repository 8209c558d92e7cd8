//! # startrade-session
//!
//! **Session envelope**: identity exchange, bearer token lifecycle,
//! presence tracking, and the reconciliation sweeper.
//!
//! ## Architecture
//!
//! The envelope sits between the request layer and the store:
//! 1. **IdentityGateway**: exchanges an opaque platform ticket for a
//!    stable identity, with bounded retry on transient upstream failure
//! 2. **TokenSigner**: mints and verifies ed25519-signed wire tokens
//! 3. **AuthService**: issue / validate / authenticate / revoke with
//!    sliding expiration and persisted revocation
//! 4. **PresenceTracker**: opens and closes per-login session windows
//! 5. **Sweeper**: the hourly reconciliation pass over tokens, sessions,
//!    and presence records
//!
//! ## Login Flow
//!
//! ```text
//! ticket → IdentityGateway.resolve() → AuthService.issue()
//!        → AuthToken row + PresenceRecord upsert + PresenceSession open
//! ```
//!
//! Every subsequent call authorizes through [`AuthService::authenticate`],
//! which slides the token's expiry and the identity's last-seen marker.

pub mod auth;
pub mod gateway;
pub mod presence;
pub mod signer;
pub mod sweeper;

pub use auth::AuthService;
pub use gateway::{IdentityGateway, TicketVerifier, VerifyFailure};
pub use presence::PresenceTracker;
pub use signer::TokenSigner;
pub use sweeper::{SweepReport, Sweeper};
