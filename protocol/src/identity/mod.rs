//! # Identity Module
//!
//! A wallet identity is its Ed25519 public key. Humans see it as a 58-char
//! checksummed base32 address; the ledger codec carries the raw 32 bytes.
//!
//! Two addresses name the same wallet iff their canonical strings are equal.
//! Comparisons in the verifier always go through [`Address`] so that a
//! token's sender and the claimed identity are judged the same way.

pub mod address;

pub use address::{Address, AddressError};
