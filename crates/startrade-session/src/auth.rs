//! Token issuance, validation, and revocation.
//!
//! The validator's reject order is deliberate: the persisted row (unknown
//! / revoked / expired) is consulted before the signature is trusted. A
//! structurally valid signature proves who minted the token; only the row
//! knows whether it still authorizes anything.

use std::sync::Arc;

use chrono::Utc;
use startrade_store::Store;
use startrade_types::{
    AuthConfig, AuthToken, Identity, IssuedToken, Result, StarError, TokenClaims, TokenId,
};
use tracing::{debug, info};

use crate::{PresenceTracker, TokenSigner};

/// Issues, validates, and revokes bearer tokens; the single entry point
/// the request layer consumes for authorization.
#[derive(Debug)]
pub struct AuthService {
    store: Arc<Store>,
    signer: TokenSigner,
    tracker: PresenceTracker,
    config: AuthConfig,
}

impl AuthService {
    #[must_use]
    pub fn new(store: Arc<Store>, signer: TokenSigner, config: AuthConfig) -> Self {
        info!(key = %signer.key_fingerprint(), "auth service ready");
        Self {
            store,
            tracker: PresenceTracker::new(config.session_policy),
            signer,
            config,
        }
    }

    /// Mint a token for a verified identity and open its session window.
    ///
    /// One transaction: token row insert, presence upsert (display name
    /// refreshes on every login), session open per policy.
    pub fn issue(
        &self,
        identity: Identity,
        display_name: &str,
        client: Option<String>,
    ) -> Result<IssuedToken> {
        let now = Utc::now();
        let claims = TokenClaims {
            token_id: TokenId::new(),
            identity: identity.clone(),
            display_name: display_name.to_string(),
            issued_at: now,
        };
        let token = self.signer.mint(&claims)?;
        let expires_at = now + self.config.ttl();

        self.store.write(|state| {
            state.insert_token(AuthToken {
                token: token.clone(),
                identity: identity.clone(),
                display_name: display_name.to_string(),
                issued_at: now,
                expires_at,
                revoked: false,
            });
            state.upsert_presence(identity.clone(), display_name, now);
            self.tracker
                .open_session(state, &identity, display_name, client.clone(), now);
            Ok(())
        })?;

        info!(%identity, display_name, "token issued");
        Ok(IssuedToken {
            token,
            identity,
            display_name: display_name.to_string(),
            expires_at,
        })
    }

    /// Validate a wire token and slide its expiry.
    ///
    /// # Errors
    /// [`StarError::TokenMalformed`] (doesn't parse, or bad signature),
    /// [`StarError::TokenUnknown`], [`StarError::TokenRevoked`],
    /// [`StarError::TokenExpired`].
    pub fn validate(&self, token: &str) -> Result<TokenClaims> {
        let claims = TokenSigner::decode(token)?;

        self.store.write(|state| {
            let now = Utc::now();
            let row = state.token(token).ok_or(StarError::TokenUnknown)?;
            if row.revoked {
                return Err(StarError::TokenRevoked);
            }
            if row.is_expired(now) {
                return Err(StarError::TokenExpired);
            }
            let identity = row.identity.clone();

            // Persisted state cleared the token; the signature is checked
            // only now.
            self.signer.verify(token)?;

            let ttl = self.config.ttl();
            let row = state
                .token_mut(token)
                .expect("row fetched above in this transaction");
            row.expires_at = now + ttl;
            state.touch_presence(&identity, now);
            debug!(%identity, "token validated; expiry slid forward");
            Ok(())
        })?;

        Ok(claims)
    }

    /// The request layer's single authorization entry point: takes the
    /// raw `Authorization` header value.
    pub fn authenticate(&self, raw_header_value: &str) -> Result<TokenClaims> {
        let token = raw_header_value
            .strip_prefix("Bearer ")
            .ok_or(StarError::TokenMalformed)?;
        self.validate(token)
    }

    /// Revoke a token (logout).
    ///
    /// One transaction: mark the row revoked, close the identity's open
    /// session windows, and drop the presence record if this was the
    /// identity's last unrevoked token.
    pub fn revoke(&self, token: &str) -> Result<()> {
        let identity = self.store.write(|state| {
            let now = Utc::now();
            let row = state.token_mut(token).ok_or(StarError::TokenUnknown)?;
            row.revoked = true;
            let identity = row.identity.clone();

            self.tracker.close_sessions(state, &identity, now);
            if state.unrevoked_token_count(&identity) == 0 {
                state.remove_presence(&identity);
                debug!(%identity, "last token revoked; presence record dropped");
            }
            Ok(identity)
        })?;

        info!(%identity, "token revoked");
        Ok(())
    }
}
