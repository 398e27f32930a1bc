//! Canonical ledger codec.
//!
//! MessagePack with named fields, sorted short keys, zero values omitted and
//! byte fields as `bin`. A token on the wire is base64 (standard alphabet,
//! padded) over the encoding of a [`SignedAuthTransaction`].
//!
//! Decoding is strict. After parsing, the value is re-encoded and must
//! reproduce the input byte-for-byte. That single check rejects unsorted
//! keys, explicit zero fields, oversized integer encodings, array-form
//! structs and trailing bytes, so two different byte strings can never
//! verify as the same token.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::builder::AuthTransaction;
use super::types::fixed_bytes;
use crate::config::SIGNATURE_LENGTH;
use crate::crypto::keys::WalletSignature;

/// Errors raised while encoding or decoding ledger bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encoding failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("decoding failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("encoding is not canonical")]
    NonCanonical,
}

/// A transaction plus its detached signature. Lsig and msig forms are not
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedAuthTransaction {
    #[serde(with = "fixed_bytes")]
    pub sig: [u8; SIGNATURE_LENGTH],

    pub txn: AuthTransaction,
}

impl SignedAuthTransaction {
    pub fn new(txn: AuthTransaction, signature: WalletSignature) -> Self {
        Self {
            sig: signature.to_bytes(),
            txn,
        }
    }

    pub fn signature(&self) -> WalletSignature {
        WalletSignature::from_bytes(self.sig)
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Parse canonical bytes. Anything the encoder would not have produced is
    /// rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let signed: Self = rmp_serde::from_slice(bytes)?;
        if signed.encode()? != bytes {
            return Err(CodecError::NonCanonical);
        }
        Ok(signed)
    }

    /// Encode and wrap as a bearer token string.
    pub fn to_token(&self) -> Result<String, CodecError> {
        Ok(STANDARD.encode(self.encode()?))
    }

    pub fn from_token(token: &str) -> Result<Self, CodecError> {
        let bytes = STANDARD.decode(token)?;
        Self::decode(&bytes)
    }
}

/// Canonical encoding of a bare transaction.
pub fn encode_transaction(txn: &AuthTransaction) -> Result<Vec<u8>, CodecError> {
    Ok(rmp_serde::to_vec_named(txn)?)
}

/// Decode a bare transaction, with the same canonical-form check as
/// [`SignedAuthTransaction::decode`].
pub fn decode_transaction(bytes: &[u8]) -> Result<AuthTransaction, CodecError> {
    let txn: AuthTransaction = rmp_serde::from_slice(bytes)?;
    if encode_transaction(&txn)? != bytes {
        return Err(CodecError::NonCanonical);
    }
    Ok(txn)
}
