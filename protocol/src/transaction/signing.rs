//! The signer capability.
//!
//! Signing is a separate step from building because the key is usually not
//! in-process: a browser wallet or hardware device owns it and answers
//! asynchronously, after a human clicks "approve" (or doesn't). The token
//! constructor only ever sees this trait.
//!
//! [`LocalSigner`] is the in-process implementation used by the CLI and
//! tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::crypto::keys::{WalletKeypair, WalletPublicKey, WalletSignature};
use crate::crypto::sign;
use crate::identity::Address;

/// Why a signer failed to produce a signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("signing request declined")]
    Declined,

    #[error("signing request timed out")]
    TimedOut,

    #[error("signer failed: {0}")]
    Failed(String),
}

/// Something that can sign raw transaction bytes on behalf of a wallet.
///
/// `bytes_to_sign` already carries the `"TX"` domain separator. Implementors
/// sign it as-is; they must not hash, prefix or re-encode it.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_bytes(&self, bytes_to_sign: &[u8]) -> Result<WalletSignature, SignerError>;
}

/// A signer backed by a keypair held in memory.
#[derive(Debug, Clone)]
pub struct LocalSigner {
    keypair: WalletKeypair,
}

impl LocalSigner {
    pub fn new(keypair: WalletKeypair) -> Self {
        Self { keypair }
    }

    pub fn generate() -> Self {
        Self::new(WalletKeypair::generate())
    }

    pub fn public_key(&self) -> WalletPublicKey {
        self.keypair.public_key()
    }

    /// The address this signer speaks for.
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.keypair.public_key())
    }
}

#[async_trait]
impl TransactionSigner for LocalSigner {
    async fn sign_bytes(&self, bytes_to_sign: &[u8]) -> Result<WalletSignature, SignerError> {
        Ok(sign(&self.keypair, bytes_to_sign))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_signer_signature_verifies() {
        let signer = LocalSigner::generate();
        let msg = b"TX\x81\xa3fee\x01";
        let sig = signer.sign_bytes(msg).await.unwrap();
        assert!(signer.public_key().verify(msg, &sig));
    }

    #[tokio::test]
    async fn signing_is_deterministic() {
        let signer = LocalSigner::new(WalletKeypair::from_seed(&[8u8; 32]));
        let a = signer.sign_bytes(b"same bytes").await.unwrap();
        let b = signer.sign_bytes(b"same bytes").await.unwrap();
        assert_eq!(a, b, "Ed25519 signing is deterministic for the same key and message");
    }

    #[tokio::test]
    async fn different_signers_produce_different_signatures() {
        let a = LocalSigner::generate().sign_bytes(b"m").await.unwrap();
        let b = LocalSigner::generate().sign_bytes(b"m").await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn address_matches_public_key() {
        let signer = LocalSigner::generate();
        assert_eq!(signer.address().public_key(), signer.public_key());
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let signer: Box<dyn TransactionSigner> = Box::new(LocalSigner::generate());
        assert!(signer.sign_bytes(b"x").await.is_ok());
    }
}
