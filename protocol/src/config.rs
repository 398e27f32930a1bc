//! # Policy Configuration & Constants
//!
//! The pinned-field policy is the contract between whoever mints tokens and
//! whoever checks them. If the two sides disagree on a single value, every
//! token is rejected, so all defaults live here and nowhere else.
//!
//! The defaults match the hosted deployment: a mainnet-shaped payment
//! pinned to round 10, one day of validity, and a thirty minute grace window
//! for clocks that run ahead.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 public keys are 32 bytes. So are wallet addresses, before the
/// checksum is appended.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of a genesis hash in bytes.
pub const GENESIS_HASH_LENGTH: usize = 32;

/// Number of trailing SHA-512/256 digest bytes appended to an address.
pub const ADDRESS_CHECKSUM_LENGTH: usize = 4;

/// Length of a canonical address string: base32 of 36 bytes, unpadded.
pub const ADDRESS_STRING_LENGTH: usize = 58;

/// Domain separator prepended to the canonical transaction encoding before
/// signing. A signature over these bytes can never be confused with a
/// signature over some other message type.
pub const TX_SIGNING_PREFIX: &[u8] = b"TX";

// ---------------------------------------------------------------------------
// Policy Defaults
// ---------------------------------------------------------------------------

/// Issuer string written into every note. Binds a token to one service.
pub const DEFAULT_ISSUER: &str = "https://stateless-auth.vercel.app/";

/// Pinned first valid round. Opaque constant, not a ledger-validity check.
pub const DEFAULT_FIRST_ROUND: u64 = 10;

/// Pinned last valid round. Equal to the first round, which makes the
/// transaction useless on a live ledger long past round 10.
pub const DEFAULT_LAST_ROUND: u64 = 10;

/// Pinned genesis identifier.
pub const DEFAULT_GENESIS_ID: &str = "mainnet-v1.0";

/// Pinned genesis hash (`wGHE2Pwdvd7S12BL5FaOP20EGYesN73ktiC1qzkkit8=`).
pub const DEFAULT_GENESIS_HASH: [u8; GENESIS_HASH_LENGTH] = [
    0xc0, 0x61, 0xc4, 0xd8, 0xfc, 0x1d, 0xbd, 0xde, 0xd2, 0xd7, 0x60, 0x4b, 0xe4, 0x56, 0x8e, 0x3f,
    0x6d, 0x04, 0x19, 0x87, 0xac, 0x37, 0xbd, 0xe4, 0xb6, 0x20, 0xb5, 0xab, 0x39, 0x24, 0x8a, 0xdf,
];

/// How long a freshly minted token lives.
pub const DEFAULT_EXPIRY_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Extra slack on top of the expiry duration before a future expiry is
/// considered implausible.
pub const DEFAULT_MAX_SKEW_TOLERANCE: Duration = Duration::from_secs(30 * 60);

/// Default HTTP port for the verifying server.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

// ---------------------------------------------------------------------------
// PolicyError
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating an [`AuthPolicy`].
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid policy: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// AuthPolicy
// ---------------------------------------------------------------------------

/// The fixed set of values every auth transaction must carry.
///
/// Loaded once at process start and never mutated afterwards. The
/// constructor writes these values, the verifier demands them back
/// byte-for-byte.
///
/// # JSON form
///
/// ```json
/// {
///   "issuer": "https://stateless-auth.vercel.app/",
///   "first_round": 10,
///   "last_round": 10,
///   "genesis_id": "mainnet-v1.0",
///   "genesis_hash": "wGHE2Pwdvd7S12BL5FaOP20EGYesN73ktiC1qzkkit8=",
///   "expiry_duration_ms": 86400000,
///   "max_skew_tolerance_ms": 1800000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthPolicy {
    /// Issuer string bound into the note. Must not contain a space, since
    /// the note uses a single space as its separator.
    pub issuer: String,

    /// Pinned `fv` value.
    pub first_round: u64,

    /// Pinned `lv` value.
    pub last_round: u64,

    /// Pinned `gen` value.
    pub genesis_id: String,

    /// Pinned `gh` value. Base64 in JSON.
    #[serde(with = "base64_hash")]
    pub genesis_hash: [u8; GENESIS_HASH_LENGTH],

    /// Lifetime of tokens minted under this policy.
    #[serde(rename = "expiry_duration_ms", with = "duration_ms")]
    pub expiry_duration: Duration,

    /// Slack added to `expiry_duration` when bounding future expiries.
    #[serde(rename = "max_skew_tolerance_ms", with = "duration_ms")]
    pub max_skew_tolerance: Duration,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            first_round: DEFAULT_FIRST_ROUND,
            last_round: DEFAULT_LAST_ROUND,
            genesis_id: DEFAULT_GENESIS_ID.to_string(),
            genesis_hash: DEFAULT_GENESIS_HASH,
            expiry_duration: DEFAULT_EXPIRY_DURATION,
            max_skew_tolerance: DEFAULT_MAX_SKEW_TOLERANCE,
        }
    }
}

impl AuthPolicy {
    /// Parses and validates a policy from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reads, parses, and validates a policy file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects policies that could never produce a verifiable token.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.issuer.is_empty() {
            return Err(PolicyError::Invalid("issuer must not be empty".into()));
        }
        if self.issuer.contains(' ') {
            return Err(PolicyError::Invalid(
                "issuer must not contain spaces".into(),
            ));
        }
        if self.first_round > self.last_round {
            return Err(PolicyError::Invalid(format!(
                "first_round {} is after last_round {}",
                self.first_round, self.last_round
            )));
        }
        if self.expiry_duration.is_zero() {
            return Err(PolicyError::Invalid(
                "expiry_duration must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Token lifetime in milliseconds.
    pub fn expiry_duration_ms(&self) -> u64 {
        duration_to_ms(self.expiry_duration)
    }

    /// Furthest a token's expiry may sit past "now" and still be accepted.
    pub fn max_future_window_ms(&self) -> u64 {
        self.expiry_duration_ms()
            .saturating_add(duration_to_ms(self.max_skew_tolerance))
    }
}

/// Milliseconds in a `Duration`, saturating at `u64::MAX`.
fn duration_to_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Current Unix time in milliseconds.
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

mod duration_ms {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(duration_to_ms(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

mod base64_hash {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(hash: &[u8; GENESIS_HASH_LENGTH], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<[u8; GENESIS_HASH_LENGTH], D::Error> {
        let text = String::deserialize(d)?;
        let bytes = STANDARD.decode(text.as_bytes()).map_err(D::Error::custom)?;
        <[u8; GENESIS_HASH_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| {
            D::Error::custom(format!(
                "genesis hash must be {} bytes, got {}",
                GENESIS_HASH_LENGTH,
                bytes.len()
            ))
        })
    }
}
