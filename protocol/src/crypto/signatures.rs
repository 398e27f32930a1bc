//! # Detached Signatures
//!
//! The one place the verifier touches Ed25519. Everything upstream deals in
//! typed addresses and transactions; this adapter takes raw bytes off the
//! wire and answers yes or no.
//!
//! Verification is strict (`verify_strict`): small-order keys and
//! non-canonical `R` components are rejected instead of quietly accepted.

use thiserror::Error;

use super::keys::{WalletKeypair, WalletPublicKey, WalletSignature};
use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors during signature operations.
///
/// Intentionally a single variant. There is no useful distinction to report
/// to a caller that is not also useful to an attacker.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,
}

/// Sign a message with a wallet keypair.
pub fn sign(keypair: &WalletKeypair, message: &[u8]) -> WalletSignature {
    keypair.sign(message)
}

/// Verify a detached signature given raw key and signature bytes.
pub fn verify_detached(
    public_key_bytes: &[u8; PUBLIC_KEY_LENGTH],
    message: &[u8],
    signature_bytes: &[u8; SIGNATURE_LENGTH],
) -> Result<(), SignatureError> {
    let public_key = WalletPublicKey::from_bytes(*public_key_bytes);
    let signature = WalletSignature::from_bytes(*signature_bytes);
    if public_key.verify(message, &signature) {
        Ok(())
    } else {
        Err(SignatureError::VerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_roundtrip() {
        let kp = WalletKeypair::generate();
        let msg = b"bytes go in, bytes come out";
        let sig = sign(&kp, msg);
        assert!(verify_detached(kp.public_key().as_bytes(), msg, sig.as_bytes()).is_ok());
    }

    #[test]
    fn flipped_bit_fails() {
        let kp = WalletKeypair::generate();
        let msg = b"TXpayload";
        let mut sig = sign(&kp, msg).to_bytes();
        sig[10] ^= 0x01;
        assert!(verify_detached(kp.public_key().as_bytes(), msg, &sig).is_err());
    }

    #[test]
    fn identity_point_key_rejected() {
        // All zeros decodes to a small-order point; strict verification
        // refuses it.
        let msg = b"doesn't matter";
        assert!(verify_detached(&[0u8; 32], msg, &[0u8; 64]).is_err());
    }

    #[test]
    fn empty_message_signs_fine() {
        let kp = WalletKeypair::generate();
        let sig = sign(&kp, b"");
        assert!(verify_detached(kp.public_key().as_bytes(), b"", sig.as_bytes()).is_ok());
    }
}
