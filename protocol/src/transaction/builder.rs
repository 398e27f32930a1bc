//! Auth transaction construction via the builder pattern.
//!
//! The [`AuthTransactionBuilder`] starts from the policy: a zero-value,
//! zero-fee self-payment with the pinned rounds and genesis. The only field
//! a well-behaved client ever sets is the note. The remaining setters exist
//! so tests can produce off-policy transactions and watch them get rejected.
//!
//! The builder does not sign. That happens through a
//! [`TransactionSigner`](super::signing::TransactionSigner), which keeps
//! construction testable without key material.

use serde::{Deserialize, Serialize};

use super::codec::{self, CodecError};
use super::types::{fixed_bytes, TransactionType};
use crate::config::{AuthPolicy, GENESIS_HASH_LENGTH, TX_SIGNING_PREFIX};
use crate::identity::Address;

// ---------------------------------------------------------------------------
// AuthTransaction
// ---------------------------------------------------------------------------

/// A ledger payment transaction, restricted to the fields an auth token can
/// carry.
///
/// Field order matters: the codec writes keys in declaration order, and the
/// ledger's canonical form wants them sorted. Zero and empty values are
/// omitted from the encoding. Any key not listed here fails decoding, which
/// is how close-to, rekey and friends are kept out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthTransaction {
    /// Microunits moved. Always zero for an auth token.
    #[serde(rename = "amt", default, skip_serializing_if = "is_zero")]
    pub amount: u64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub fee: u64,

    #[serde(rename = "fv", default, skip_serializing_if = "is_zero")]
    pub first_valid: u64,

    #[serde(rename = "gen", default, skip_serializing_if = "String::is_empty")]
    pub genesis_id: String,

    #[serde(
        rename = "gh",
        default,
        with = "fixed_bytes",
        skip_serializing_if = "fixed_bytes::is_zero"
    )]
    pub genesis_hash: [u8; GENESIS_HASH_LENGTH],

    #[serde(rename = "lv", default, skip_serializing_if = "is_zero")]
    pub last_valid: u64,

    /// Free-form bytes. Auth tokens put `"<issuer> <expiry-ms>"` here.
    #[serde(default, with = "serde_bytes", skip_serializing_if = "Vec::is_empty")]
    pub note: Vec<u8>,

    #[serde(rename = "rcv")]
    pub receiver: Address,

    #[serde(rename = "snd")]
    pub sender: Address,

    #[serde(rename = "type")]
    pub tx_type: TransactionType,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl AuthTransaction {
    /// The exact bytes a wallet signs: `"TX"` followed by the canonical
    /// encoding of this transaction.
    pub fn bytes_to_sign(&self) -> Result<Vec<u8>, CodecError> {
        let encoded = codec::encode_transaction(self)?;
        let mut buf = Vec::with_capacity(TX_SIGNING_PREFIX.len() + encoded.len());
        buf.extend_from_slice(TX_SIGNING_PREFIX);
        buf.extend_from_slice(&encoded);
        Ok(buf)
    }

    /// The note as text, if it is valid UTF-8.
    pub fn note_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.note).ok()
    }

    /// A payment from an account to itself.
    pub fn is_self_transfer(&self) -> bool {
        self.sender == self.receiver
    }
}

// ---------------------------------------------------------------------------
// AuthTransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`AuthTransaction`] instances.
///
/// # Usage
///
/// ```rust
/// use wallet_auth::config::AuthPolicy;
/// use wallet_auth::identity::Address;
/// use wallet_auth::transaction::AuthTransactionBuilder;
///
/// let policy = AuthPolicy::default();
/// let me = Address::from_bytes([7u8; 32]);
/// let tx = AuthTransactionBuilder::new(me, &policy)
///     .note("https://stateless-auth.vercel.app/ 1700000000000")
///     .build();
///
/// assert!(tx.is_self_transfer());
/// assert_eq!(tx.amount, 0);
/// ```
#[derive(Debug, Clone)]
pub struct AuthTransactionBuilder {
    txn: AuthTransaction,
}

impl AuthTransactionBuilder {
    /// A policy-conformant self-payment from `identity` with an empty note.
    pub fn new(identity: Address, policy: &AuthPolicy) -> Self {
        Self {
            txn: AuthTransaction {
                amount: 0,
                fee: 0,
                first_valid: policy.first_round,
                genesis_id: policy.genesis_id.clone(),
                genesis_hash: policy.genesis_hash,
                last_valid: policy.last_round,
                note: Vec::new(),
                receiver: identity,
                sender: identity,
                tx_type: TransactionType::Payment,
            },
        }
    }

    pub fn note(mut self, note: impl Into<Vec<u8>>) -> Self {
        self.txn.note = note.into();
        self
    }

    pub fn receiver(mut self, receiver: Address) -> Self {
        self.txn.receiver = receiver;
        self
    }

    pub fn amount(mut self, amount: u64) -> Self {
        self.txn.amount = amount;
        self
    }

    pub fn fee(mut self, fee: u64) -> Self {
        self.txn.fee = fee;
        self
    }

    pub fn rounds(mut self, first_valid: u64, last_valid: u64) -> Self {
        self.txn.first_valid = first_valid;
        self.txn.last_valid = last_valid;
        self
    }

    pub fn genesis(mut self, id: impl Into<String>, hash: [u8; GENESIS_HASH_LENGTH]) -> Self {
        self.txn.genesis_id = id.into();
        self.txn.genesis_hash = hash;
        self
    }

    pub fn tx_type(mut self, tx_type: TransactionType) -> Self {
        self.txn.tx_type = tx_type;
        self
    }

    pub fn build(self) -> AuthTransaction {
        self.txn
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AuthTransaction {
        AuthTransactionBuilder::new(Address::from_bytes([0x11; 32]), &AuthPolicy::default())
            .note("example 1700000000000")
            .build()
    }

    #[test]
    fn defaults_come_from_policy() {
        let policy = AuthPolicy::default();
        let tx = sample();
        assert_eq!(tx.first_valid, policy.first_round);
        assert_eq!(tx.last_valid, policy.last_round);
        assert_eq!(tx.genesis_id, policy.genesis_id);
        assert_eq!(tx.genesis_hash, policy.genesis_hash);
        assert_eq!(tx.amount, 0);
        assert_eq!(tx.fee, 0);
        assert_eq!(tx.tx_type, TransactionType::Payment);
        assert!(tx.is_self_transfer());
    }

    #[test]
    fn signing_bytes_match_golden_vector() {
        // Canonical ledger encoding of the sample, with the "TX" prefix.
        let expected = concat!(
            "5458",
            "88",
            "a266760a",
            "a367656eac6d61696e6e65742d76312e30",
            "a26768c420c061c4d8fc1dbdded2d7604be4568e3f6d041987ac37bde4b620b5ab39248adf",
            "a26c760a",
            "a46e6f7465c4156578616d706c652031373030303030303030303030",
            "a3726376c4201111111111111111111111111111111111111111111111111111111111111111",
            "a3736e64c4201111111111111111111111111111111111111111111111111111111111111111",
            "a474797065a3706179",
        );
        assert_eq!(hex::encode(sample().bytes_to_sign().unwrap()), expected);
    }

    #[test]
    fn signing_bytes_start_with_domain_separator() {
        let bytes = sample().bytes_to_sign().unwrap();
        assert_eq!(&bytes[..2], b"TX");
    }

    #[test]
    fn note_change_changes_signing_bytes() {
        let a = sample();
        let b = AuthTransactionBuilder::new(a.sender, &AuthPolicy::default())
            .note("example 1700000000001")
            .build();
        assert_ne!(a.bytes_to_sign().unwrap(), b.bytes_to_sign().unwrap());
    }

    #[test]
    fn nonzero_amount_is_encoded() {
        let tx = AuthTransactionBuilder::new(Address::from_bytes([1; 32]), &AuthPolicy::default())
            .amount(5)
            .build();
        let encoded = codec::encode_transaction(&tx).unwrap();
        // "amt" key present.
        assert!(encoded.windows(3).any(|w| w == b"amt"));
    }

    #[test]
    fn note_str_rejects_invalid_utf8() {
        let tx = AuthTransactionBuilder::new(Address::from_bytes([1; 32]), &AuthPolicy::default())
            .note(vec![0xff, 0xfe])
            .build();
        assert!(tx.note_str().is_none());
    }

    #[test]
    fn receiver_override_breaks_self_transfer() {
        let tx = AuthTransactionBuilder::new(Address::from_bytes([1; 32]), &AuthPolicy::default())
            .receiver(Address::from_bytes([2; 32]))
            .build();
        assert!(!tx.is_self_transfer());
    }
}
