//! # Wallet Addresses
//!
//! An address is the human-facing form of an Ed25519 public key:
//!
//! ```text
//! public_key (32 bytes)
//!     -> checksum = SHA-512/256(public_key)[28..32]
//!     -> base32_nopad(public_key || checksum) -> 58 chars
//! ```
//!
//! Unlike a hashed address, this one is reversible: the raw key comes
//! straight back out, which is exactly what the verifier needs to check a
//! signature without any key lookup.
//!
//! On the wire (inside a transaction) an address is the raw 32 bytes. In
//! logs, URLs and comparisons it is the checksummed string.

use base32::Alphabet;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{ADDRESS_CHECKSUM_LENGTH, ADDRESS_STRING_LENGTH, PUBLIC_KEY_LENGTH};
use crate::crypto::hash::sha512_256;
use crate::crypto::keys::WalletPublicKey;

const ALPHABET: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Errors produced while parsing an address string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address length: expected {expected} characters, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid base32 encoding")]
    InvalidEncoding,

    #[error("address checksum mismatch")]
    InvalidChecksum,
}

/// A wallet identity: the raw public key plus its canonical string form.
///
/// # Examples
///
/// ```
/// use wallet_auth::crypto::WalletKeypair;
/// use wallet_auth::identity::Address;
///
/// let kp = WalletKeypair::generate();
/// let address = Address::from_public_key(&kp.public_key());
/// let text = address.to_string();
/// assert_eq!(text.len(), 58);
///
/// let recovered: Address = text.parse().unwrap();
/// assert_eq!(recovered, address);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; PUBLIC_KEY_LENGTH]);

impl Address {
    /// The all-zero address. Never a valid signer.
    pub const ZERO: Address = Address([0u8; PUBLIC_KEY_LENGTH]);

    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_public_key(pk: &WalletPublicKey) -> Self {
        Self(*pk.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// The public key this address encodes.
    pub fn public_key(&self) -> WalletPublicKey {
        WalletPublicKey::from_bytes(self.0)
    }

    /// Canonical checksummed string form.
    pub fn encode(&self) -> String {
        let digest = sha512_256(&self.0);
        let mut payload = Vec::with_capacity(PUBLIC_KEY_LENGTH + ADDRESS_CHECKSUM_LENGTH);
        payload.extend_from_slice(&self.0);
        payload.extend_from_slice(&digest[digest.len() - ADDRESS_CHECKSUM_LENGTH..]);
        base32::encode(ALPHABET, &payload)
    }

    /// Parse and checksum-validate an address string.
    pub fn decode(text: &str) -> Result<Self, AddressError> {
        if text.len() != ADDRESS_STRING_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_STRING_LENGTH,
                got: text.len(),
            });
        }

        let decoded = base32::decode(ALPHABET, text).ok_or(AddressError::InvalidEncoding)?;
        if decoded.len() != PUBLIC_KEY_LENGTH + ADDRESS_CHECKSUM_LENGTH {
            return Err(AddressError::InvalidEncoding);
        }

        let (key, checksum) = decoded.split_at(PUBLIC_KEY_LENGTH);
        let digest = sha512_256(key);
        if checksum != &digest[digest.len() - ADDRESS_CHECKSUM_LENGTH..] {
            return Err(AddressError::InvalidChecksum);
        }

        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(key);
        let address = Self(bytes);

        // base32 decoding ignores the low bits of the final character, so two
        // strings can decode to the same key. Only the canonical one is valid.
        if address.encode() != text {
            return Err(AddressError::InvalidEncoding);
        }
        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Serialized as a raw 32-byte binary string, the way the ledger codec
/// carries `snd` and `rcv`.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let buf = serde_bytes::ByteBuf::deserialize(deserializer)?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] = buf
            .as_slice()
            .try_into()
            .map_err(|_| D::Error::invalid_length(buf.len(), &"a 32-byte public key"))?;
        Ok(Self(bytes))
    }
}
