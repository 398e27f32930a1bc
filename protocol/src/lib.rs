// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Wallet Auth - Core Library
//!
//! Stateless authentication for wallet holders. A client proves it controls
//! an Ed25519 wallet by signing a zero-value payment to itself whose note
//! carries an issuer string and an expiry. The signed transaction, base64
//! encoded, is the bearer token. The server keeps no session table: every
//! request re-verifies the token from scratch.
//!
//! ## Architecture
//!
//! - **config** - The pinned-field policy both sides must agree on.
//! - **crypto** - Ed25519 keys and the detached-signature adapter.
//! - **identity** - Checksummed base32 wallet addresses.
//! - **transaction** - The auth transaction, its canonical codec, and the
//!   signer capability.
//! - **token** - Note format, the token constructor, and the verifier.
//!
//! ## Ground Rules
//!
//! 1. The expiry lives inside the signed bytes. Extending a token's life
//!    means forging a signature.
//! 2. Every field except the note is pinned. A signature over anything else
//!    is not an auth token, no matter how valid the signature is.
//! 3. The verifier fails closed. Signature verification is the last gate and
//!    the only path to `Ok(())`.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod token;
pub mod transaction;

pub use config::AuthPolicy;
pub use identity::Address;
pub use token::{
    authenticate, build_token, AuthError, BuildError, TokenBuilder, TokenVerifier, VerifiedToken,
};
pub use transaction::{LocalSigner, SignerError, TransactionSigner};
