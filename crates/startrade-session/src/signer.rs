//! Token minting and verification.
//!
//! Wire format: `hex(claims_json) "." hex(signature)` where the ed25519
//! signature covers the canonical signing payload, not the JSON bytes.
//! Expiry is deliberately absent from the signed claims — it lives in the
//! store row and slides forward on every successful validation, so baking
//! it into the signature would invalidate tokens the store still honors.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use startrade_types::{Result, StarError, TokenClaims};

/// Mints and verifies wire tokens with a node-local ed25519 key.
pub struct TokenSigner {
    signing_key: SigningKey,
}

impl TokenSigner {
    /// Generate a fresh keypair. Tokens from a previous process die with
    /// its key, but their store rows still gate them, so the failure mode
    /// is a clean `TokenMalformed` rather than anything silent.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Rebuild the signer from a persisted 32-byte seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Short key fingerprint for logs: first 8 bytes of the SHA-256 of
    /// the verifying key, hex-encoded.
    #[must_use]
    pub fn key_fingerprint(&self) -> String {
        let digest = Sha256::digest(self.signing_key.verifying_key().as_bytes());
        hex::encode(&digest[..8])
    }

    /// Mint the wire string for a set of claims.
    pub fn mint(&self, claims: &TokenClaims) -> Result<String> {
        let json = serde_json::to_vec(claims)
            .map_err(|e| StarError::Internal(format!("claims serialization: {e}")))?;
        let signature = self.signing_key.sign(&signing_payload(claims));
        Ok(format!(
            "{}.{}",
            hex::encode(&json),
            hex::encode(signature.to_bytes())
        ))
    }

    /// Structurally decode a wire token without trusting it. The caller
    /// must still check the store row and then [`TokenSigner::verify`].
    pub fn decode(token: &str) -> Result<TokenClaims> {
        let (claims_hex, _) = split_wire(token)?;
        let json = hex::decode(claims_hex).map_err(|_| StarError::TokenMalformed)?;
        serde_json::from_slice(&json).map_err(|_| StarError::TokenMalformed)
    }

    /// Verify a wire token's signature against this signer's key.
    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        let claims = Self::decode(token)?;
        let (_, signature_hex) = split_wire(token)?;
        let signature_bytes = hex::decode(signature_hex).map_err(|_| StarError::TokenMalformed)?;
        let signature =
            Signature::from_slice(&signature_bytes).map_err(|_| StarError::TokenMalformed)?;
        self.signing_key
            .verifying_key()
            .verify(&signing_payload(&claims), &signature)
            .map_err(|_| StarError::TokenMalformed)?;
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key_fingerprint", &self.key_fingerprint())
            .finish()
    }
}

fn split_wire(token: &str) -> Result<(&str, &str)> {
    token.split_once('.').ok_or(StarError::TokenMalformed)
}

/// Canonical signing payload.
///
/// Format: `"startrade:token:v1:" || token_id || identity || 0x00 ||
/// display_name || 0x00 || issued_at_millis_le`
fn signing_payload(claims: &TokenClaims) -> Vec<u8> {
    let mut payload = Vec::with_capacity(128);
    payload.extend_from_slice(b"startrade:token:v1:");
    payload.extend_from_slice(claims.token_id.0.as_bytes());
    payload.extend_from_slice(claims.identity.as_str().as_bytes());
    payload.push(0);
    payload.extend_from_slice(claims.display_name.as_bytes());
    payload.push(0);
    payload.extend_from_slice(&claims.issued_at.timestamp_millis().to_le_bytes());
    payload
}
