//! secp256k1 signer compatible with the Sawtooth signing convention.
//!
//! Flow: message → SHA-256 → ECDSA (RFC6979 nonce, low-S) → 64-byte compact
//! signature → lowercase hex (128 chars).
//!
//! Public keys are 33-byte compressed points rendered as 66 hex chars.

use std::fmt;

use rand::RngCore;
use secp256k1::{ecdsa, All, Message, PublicKey, Secp256k1, SecretKey};
use gitchain_types::{hex_to_bytes, GitchainError, Hex, Result};

use crate::digest;

pub const PRIVATE_KEY_LENGTH: usize = secp256k1::constants::SECRET_KEY_SIZE;

/// A loaded private key together with its derived public key.
#[derive(Clone)]
pub struct Signer {
    secp: Secp256k1<All>,
    secret: SecretKey,
    public: PublicKey,
}

impl Signer {
    /// Load a signer from a hex-encoded 32-byte scalar.
    pub fn from_hex(private_key: &str) -> Result<Self> {
        let bytes = hex_to_bytes(private_key.trim())
            .map_err(|e| GitchainError::Key(format!("not valid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(GitchainError::Key(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_LENGTH,
                bytes.len()
            )));
        }
        let secret = SecretKey::from_slice(bytes)
            .map_err(|e| GitchainError::Key(format!("scalar out of range: {}", e)))?;
        Ok(Self::from_secret(secret))
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        loop {
            rng.fill_bytes(&mut bytes);
            // Rejects zero and values >= the curve order; retry is astronomically rare.
            if let Ok(secret) = SecretKey::from_slice(&bytes) {
                return Self::from_secret(secret);
            }
        }
    }

    fn from_secret(secret: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public = PublicKey::from_secret_key(&secp, &secret);
        Self { secp, secret, public }
    }

    /// Compressed public key as hex.
    pub fn public_key(&self) -> Hex {
        hex::encode(self.public.serialize())
    }

    pub fn private_key_hex(&self) -> Hex {
        hex::encode(self.secret.secret_bytes())
    }

    /// Sign `message` and return the compact signature as hex.
    pub fn sign(&self, message: &[u8]) -> Hex {
        let msg = Message::from_digest(digest::sha256(message));
        let signature = self.secp.sign_ecdsa(&msg, &self.secret);
        hex::encode(signature.serialize_compact())
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Verify a hex compact signature over `message` against a hex public key.
///
/// Returns `Ok(false)` for a well-formed signature that does not match, and a
/// `Key` error when the public key or signature cannot be parsed.
pub fn verify(public_key: &str, message: &[u8], signature: &str) -> Result<bool> {
    let secp = Secp256k1::verification_only();
    let pk_bytes = hex_to_bytes(public_key)
        .map_err(|e| GitchainError::Key(format!("public key is not valid hex: {}", e)))?;
    let public = PublicKey::from_slice(&pk_bytes)
        .map_err(|e| GitchainError::Key(format!("invalid public key: {}", e)))?;
    let sig_bytes = hex_to_bytes(signature)
        .map_err(|e| GitchainError::Key(format!("signature is not valid hex: {}", e)))?;
    let sig = ecdsa::Signature::from_compact(&sig_bytes)
        .map_err(|e| GitchainError::Key(format!("invalid signature: {}", e)))?;

    let msg = Message::from_digest(digest::sha256(message));
    Ok(secp.verify_ecdsa(&msg, &sig, &public).is_ok())
}
