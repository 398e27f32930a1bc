//! Server-side token verification.
//!
//! Stateless: every call re-derives everything from the token and the
//! policy. The checks run in a fixed order, cheapest first, and the
//! signature check is the only path to success.

use std::fmt;
use tracing::debug;

use super::error::AuthError;
use super::note::AuthNote;
use crate::config::{now_ms, AuthPolicy};
use crate::crypto::verify_detached;
use crate::identity::Address;
use crate::transaction::{AuthTransaction, SignedAuthTransaction, TransactionType};

/// Where in the pipeline a token was rejected. Logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStage {
    Decode,
    Note,
    Expiry,
    Policy,
    Binding,
    Signature,
}

impl VerificationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::Note => "note",
            Self::Expiry => "expiry",
            Self::Policy => "policy",
            Self::Binding => "binding",
            Self::Signature => "signature",
        }
    }
}

impl fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims of a token that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub address: Address,
    pub expires_at_ms: u64,
}

/// Verifies bearer tokens against one policy.
///
/// Cheap to clone and safe to share across request handlers.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    policy: AuthPolicy,
}

impl TokenVerifier {
    pub fn new(policy: AuthPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// `Ok(())` iff `token` proves control of `claimed_identity` right now.
    pub fn authenticate(&self, claimed_identity: &str, token: &str) -> Result<(), AuthError> {
        self.verify(claimed_identity, token).map(|_| ())
    }

    pub fn authenticate_at(
        &self,
        claimed_identity: &str,
        token: &str,
        now_ms: u64,
    ) -> Result<(), AuthError> {
        self.verify_at(claimed_identity, token, now_ms).map(|_| ())
    }

    pub fn verify(&self, claimed_identity: &str, token: &str) -> Result<VerifiedToken, AuthError> {
        self.verify_at(claimed_identity, token, now_ms())
    }

    pub fn verify_at(
        &self,
        claimed_identity: &str,
        token: &str,
        now_ms: u64,
    ) -> Result<VerifiedToken, AuthError> {
        verify_token(&self.policy, claimed_identity, token, now_ms)
    }
}

/// One-shot verification with the current clock.
pub fn authenticate(
    claimed_identity: &str,
    token: &str,
    policy: &AuthPolicy,
) -> Result<(), AuthError> {
    verify_token(policy, claimed_identity, token, now_ms()).map(|_| ())
}

fn reject(stage: VerificationStage, detail: &str, err: AuthError) -> AuthError {
    debug!(stage = %stage, detail, kind = err.kind(), "auth token rejected");
    err
}

/// The full pipeline:
///
/// 1. **Decode**: base64, then canonical ledger bytes.
/// 2. **Note**: `"<issuer> <expiry-ms>"`, strictly.
/// 3. **Canonicalize**: sender and receiver to address strings.
/// 4. **Expiry**: not past, and not beyond what the policy could issue.
/// 5. **Policy pins**: issuer, zero fee and amount, rounds, genesis, type.
/// 6. **Binding**: self-payment from the claimed identity.
/// 7. **Signature**: strict Ed25519 over the re-derived signing bytes.
fn verify_token(
    policy: &AuthPolicy,
    claimed_identity: &str,
    token: &str,
    now_ms: u64,
) -> Result<VerifiedToken, AuthError> {
    use VerificationStage as Stage;

    // 1. Decode.
    let signed = SignedAuthTransaction::from_token(token).map_err(|e| {
        let reason = e.to_string();
        reject(Stage::Decode, &reason, AuthError::malformed(reason.clone()))
    })?;
    let txn = &signed.txn;

    // 2. Note.
    let note = AuthNote::from_bytes(&txn.note).map_err(|e| {
        let reason = e.to_string();
        reject(Stage::Note, &reason, AuthError::malformed(reason.clone()))
    })?;

    // 3. Canonicalize. Comparisons below are on address strings only.
    let from = txn.sender.to_string();
    let to = txn.receiver.to_string();

    // 4. Expiry window.
    if note.expires_at_ms < now_ms {
        return Err(reject(
            Stage::Expiry,
            "expired",
            AuthError::TokenExpired {
                expires_at_ms: note.expires_at_ms,
                now_ms,
                too_far_in_future: false,
            },
        ));
    }
    if note.expires_at_ms > now_ms.saturating_add(policy.max_future_window_ms()) {
        return Err(reject(
            Stage::Expiry,
            "expiry too far in the future",
            AuthError::TokenExpired {
                expires_at_ms: note.expires_at_ms,
                now_ms,
                too_far_in_future: true,
            },
        ));
    }

    // 5. Pinned fields.
    if let Some(field) = first_pin_violation(policy, txn, &note) {
        return Err(reject(Stage::Policy, field, AuthError::InvalidAuthentication));
    }

    // 6. Identity binding. Without the second check anyone could sign a
    // valid token of their own and present it for any account.
    if from != to {
        return Err(reject(
            Stage::Binding,
            "sender and receiver differ",
            AuthError::InvalidAuthentication,
        ));
    }
    if from != claimed_identity {
        return Err(reject(
            Stage::Binding,
            "sender is not the claimed identity",
            AuthError::InvalidAuthentication,
        ));
    }

    // 7. Signature.
    let bytes_to_sign = txn.bytes_to_sign().map_err(|e| {
        let reason = e.to_string();
        reject(Stage::Signature, &reason, AuthError::InvalidAuthentication)
    })?;
    if verify_detached(txn.sender.as_bytes(), &bytes_to_sign, &signed.sig).is_err() {
        return Err(reject(
            Stage::Signature,
            "signature does not verify",
            AuthError::InvalidAuthentication,
        ));
    }

    debug!(address = %from, expires_at_ms = note.expires_at_ms, "auth token verified");
    Ok(VerifiedToken {
        address: txn.sender,
        expires_at_ms: note.expires_at_ms,
    })
}

/// Name of the first pinned field that differs from the policy.
fn first_pin_violation(
    policy: &AuthPolicy,
    txn: &AuthTransaction,
    note: &AuthNote,
) -> Option<&'static str> {
    if note.issuer != policy.issuer {
        return Some("issuer");
    }
    if txn.fee != 0 {
        return Some("fee");
    }
    if txn.first_valid != policy.first_round {
        return Some("first_valid");
    }
    if txn.last_valid != policy.last_round {
        return Some("last_valid");
    }
    if txn.genesis_id != policy.genesis_id {
        return Some("genesis_id");
    }
    if txn.genesis_hash != policy.genesis_hash {
        return Some("genesis_hash");
    }
    if txn.amount != 0 {
        return Some("amount");
    }
    if txn.tx_type != TransactionType::Payment {
        return Some("type");
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
