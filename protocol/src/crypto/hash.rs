//! # Hashing Utilities
//!
//! SHA-512/256 (FIPS 180-4 truncated SHA-512 with its own IV, *not* the
//! first half of a SHA-512 digest). Wallet addresses use the last four bytes
//! of this digest as their checksum.

use sha2::{Digest, Sha512_256};

/// Compute the SHA-512/256 digest of `data`.
pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    hasher.update(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_vector() {
        // FIPS 180-4 example for the empty string.
        assert_eq!(
            hex::encode(sha512_256(b"")),
            "c672b8d1ef56ed28ab87c3622c5114069bdd3ad7b8f9737498d0c01ecef0967a"
        );
    }

    #[test]
    fn abc_vector() {
        assert_eq!(
            hex::encode(sha512_256(b"abc")),
            "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
    }

    #[test]
    fn differs_from_truncated_sha512() {
        let truncated = &sha2::Sha512::digest(b"abc")[..32];
        assert_ne!(&sha512_256(b"abc")[..], truncated);
    }
}
