//! # Cryptographic Primitives
//!
//! Ed25519 for wallet signatures and SHA-512/256 for address checksums.
//! Everything here is a thin, typed wrapper around `ed25519-dalek` and
//! `sha2`. Nothing is home-grown.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::sha512_256;
pub use keys::{KeyError, WalletKeypair, WalletPublicKey, WalletSignature};
pub use signatures::{sign, verify_detached, SignatureError};
