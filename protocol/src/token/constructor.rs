//! Client-side token construction.
//!
//! Build the policy-pinned self-payment, stamp the note with issuer and
//! expiry, hand the signing bytes to the wallet, and wrap the result as a
//! base64 token. The only suspension point is the signer; dropping the
//! future there leaves nothing behind.

use std::time::Duration;
use tracing::{debug, warn};

use super::error::BuildError;
use super::note::AuthNote;
use crate::config::{now_ms, AuthPolicy};
use crate::identity::Address;
use crate::transaction::{
    AuthTransactionBuilder, SignedAuthTransaction, SignerError, TransactionSigner,
};

/// Produces bearer tokens for a single policy.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    policy: AuthPolicy,
    signing_timeout: Option<Duration>,
}

impl TokenBuilder {
    pub fn new(policy: AuthPolicy) -> Self {
        Self {
            policy,
            signing_timeout: None,
        }
    }

    /// Give up on the wallet after `timeout`. Without one, the builder waits
    /// as long as the signer does.
    pub fn with_signing_timeout(mut self, timeout: Duration) -> Self {
        self.signing_timeout = Some(timeout);
        self
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// Build a token for `identity` that expires one policy lifetime from now.
    pub async fn build_token<S>(&self, identity: &str, signer: &S) -> Result<String, BuildError>
    where
        S: TransactionSigner + ?Sized,
    {
        self.build_token_at(identity, signer, now_ms()).await
    }

    /// Same as [`build_token`](Self::build_token) with an explicit clock.
    pub async fn build_token_at<S>(
        &self,
        identity: &str,
        signer: &S,
        now_ms: u64,
    ) -> Result<String, BuildError>
    where
        S: TransactionSigner + ?Sized,
    {
        let address: Address = identity.parse().map_err(|e| BuildError::EncodingError {
            reason: format!("invalid identity: {e}"),
        })?;

        let note = AuthNote::new(
            self.policy.issuer.clone(),
            now_ms.saturating_add(self.policy.expiry_duration_ms()),
        );
        let txn = AuthTransactionBuilder::new(address, &self.policy)
            .note(note.to_string())
            .build();
        let bytes_to_sign = txn.bytes_to_sign()?;

        let signature = match self.signing_timeout {
            Some(limit) => tokio::time::timeout(limit, signer.sign_bytes(&bytes_to_sign))
                .await
                .map_err(|_| SignerError::TimedOut)?,
            None => signer.sign_bytes(&bytes_to_sign).await,
        }
        .map_err(|e| {
            debug!(%address, error = %e, "signer refused auth transaction");
            e
        })?;

        // A wallet holding several accounts may answer with the wrong one.
        if !address.public_key().verify(&bytes_to_sign, &signature) {
            warn!(%address, "signer returned a signature for a different account");
            return Err(BuildError::SigningDeclined {
                reason: "signature does not match the requested identity".into(),
            });
        }

        let token = SignedAuthTransaction::new(txn, signature).to_token()?;
        debug!(%address, expires_at_ms = note.expires_at_ms, "auth token built");
        Ok(token)
    }
}

/// One-shot construction with the current clock.
pub async fn build_token<S>(
    identity: &str,
    signer: &S,
    policy: &AuthPolicy,
) -> Result<String, BuildError>
where
    S: TransactionSigner + ?Sized,
{
    TokenBuilder::new(policy.clone())
        .build_token(identity, signer)
        .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
