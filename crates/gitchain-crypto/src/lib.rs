//! Signing and hashing primitives for Gitchain transactions.
//!
//! - `signer`: secp256k1 keys and Sawtooth-compatible signatures
//! - `digest`: SHA-512 payload digests and SHA-256 message hashing

pub mod digest;
pub mod signer;

pub use signer::{verify, Signer};
