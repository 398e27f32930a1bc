//! Boundary errors for token construction and verification.

use thiserror::Error;

use crate::transaction::{CodecError, SignerError};

/// Why a token was refused.
///
/// Deliberately coarse. Everything past decoding and the expiry check
/// collapses into [`AuthError::InvalidAuthentication`] so that a caller
/// probing with forged tokens learns nothing about which check tripped.
/// The verifier logs the precise stage at `debug`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token: {reason}")]
    MalformedToken { reason: String },

    #[error("token expired, authenticate again")]
    TokenExpired {
        expires_at_ms: u64,
        now_ms: u64,
        /// The expiry lies beyond anything this server would have issued.
        too_far_in_future: bool,
    },

    #[error("invalid authentication")]
    InvalidAuthentication,
}

impl AuthError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            reason: reason.into(),
        }
    }

    /// Stable label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedToken { .. } => "malformed_token",
            Self::TokenExpired {
                too_far_in_future: true,
                ..
            } => "token_too_far_in_future",
            Self::TokenExpired { .. } => "token_expired",
            Self::InvalidAuthentication => "invalid_authentication",
        }
    }
}

/// Why a token could not be produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("signing declined: {reason}")]
    SigningDeclined { reason: String },

    #[error("encoding error: {reason}")]
    EncodingError { reason: String },
}

impl From<SignerError> for BuildError {
    fn from(err: SignerError) -> Self {
        Self::SigningDeclined {
            reason: err.to_string(),
        }
    }
}

impl From<CodecError> for BuildError {
    fn from(err: CodecError) -> Self {
        Self::EncodingError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            AuthError::malformed("x").kind(),
            AuthError::TokenExpired {
                expires_at_ms: 1,
                now_ms: 2,
                too_far_in_future: false,
            }
            .kind(),
            AuthError::TokenExpired {
                expires_at_ms: 3,
                now_ms: 2,
                too_far_in_future: true,
            }
            .kind(),
            AuthError::InvalidAuthentication.kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn signer_errors_become_declined() {
        let err: BuildError = SignerError::TimedOut.into();
        assert!(matches!(err, BuildError::SigningDeclined { .. }));
    }

    #[test]
    fn invalid_authentication_message_is_generic() {
        assert_eq!(
            AuthError::InvalidAuthentication.to_string(),
            "invalid authentication"
        );
    }
}
