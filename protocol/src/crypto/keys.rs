//! # Key Management
//!
//! Ed25519 key material for wallet identities.
//!
//! On the server side only public keys ever show up: they arrive inside the
//! token as the transaction sender. Keypairs exist for the client side
//! ([`LocalSigner`](crate::transaction::LocalSigner)), for the CLI, and for
//! tests.
//!
//! Key bytes are never logged. `Debug` output shows the public half only.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors that can occur during key operations.
///
/// Deliberately vague about *why* something failed.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not hex")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignature,
}

/// An Ed25519 wallet keypair.
///
/// Intentionally not `Serialize`. Exporting a secret key should be an
/// explicit call to [`secret_key_hex`](Self::secret_key_hex), never a side
/// effect of shoving a struct into JSON.
pub struct WalletKeypair {
    signing_key: SigningKey,
}

/// The public half of a wallet identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletPublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

/// A detached Ed25519 signature. Always exactly 64 bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WalletSignature {
    bytes: [u8; SIGNATURE_LENGTH],
}

// ---------------------------------------------------------------------------
// WalletKeypair
// ---------------------------------------------------------------------------

impl WalletKeypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic keypair from a 32-byte seed. In Ed25519 the seed *is*
    /// the secret key.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Load a keypair from a hex-encoded 32-byte secret key, as written by
    /// the node's `keygen` command.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Export the secret key as hex. Handle with care.
    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// The public key for this keypair.
    pub fn public_key(&self) -> WalletPublicKey {
        WalletPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message. Deterministic per RFC 8032.
    pub fn sign(&self, message: &[u8]) -> WalletSignature {
        WalletSignature {
            bytes: self.signing_key.sign(message).to_bytes(),
        }
    }
}

impl Clone for WalletKeypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for WalletKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletKeypair(pub={})", self.public_key().to_hex())
    }
}

// ---------------------------------------------------------------------------
// WalletPublicKey
// ---------------------------------------------------------------------------

impl WalletPublicKey {
    /// Wrap raw key bytes without validating the curve point.
    ///
    /// Addresses decoded off the wire land here. An invalid point simply
    /// never verifies anything.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse key bytes, rejecting anything that is not a valid Ed25519 point.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Strict Ed25519 verification.
    ///
    /// Returns a bare boolean. Callers never learn whether the key, the
    /// point encoding, or the signature itself was the problem.
    pub fn verify(&self, message: &[u8], signature: &WalletSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.bytes);
        verifying_key.verify_strict(message, &dalek_sig).is_ok()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for WalletPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// WalletSignature
// ---------------------------------------------------------------------------

impl WalletSignature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse a signature from an arbitrary slice, as returned by a remote
    /// signer.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; SIGNATURE_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self { bytes })
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.bytes
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }
}

impl fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = hex::encode(self.bytes);
        write!(f, "WalletSignature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}
