//! Core type definitions for auth transactions.
//!
//! The ledger codec names transaction kinds with short strings (`"pay"`,
//! `"axfer"`, ...). Only `"pay"` is ever a valid auth token, but the other
//! kinds still decode so that a wrong-type token is reported as a failed
//! authentication rather than garbage.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Discriminant for the operation a transaction represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Value transfer between two accounts. The only kind an auth token uses.
    Payment,
    /// Participation key registration.
    KeyRegistration,
    /// Asset creation, reconfiguration or destruction.
    AssetConfig,
    /// Asset transfer or opt-in.
    AssetTransfer,
    /// Asset freeze.
    AssetFreeze,
    /// Application call.
    ApplicationCall,
}

impl TransactionType {
    /// Wire name used by the codec.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "pay",
            Self::KeyRegistration => "keyreg",
            Self::AssetConfig => "acfg",
            Self::AssetTransfer => "axfer",
            Self::AssetFreeze => "afrz",
            Self::ApplicationCall => "appl",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "pay" => Some(Self::Payment),
            "keyreg" => Some(Self::KeyRegistration),
            "acfg" => Some(Self::AssetConfig),
            "axfer" => Some(Self::AssetTransfer),
            "afrz" => Some(Self::AssetFreeze),
            "appl" => Some(Self::ApplicationCall),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransactionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_wire(&name).ok_or_else(|| {
            serde::de::Error::unknown_variant(
                &name,
                &["pay", "keyreg", "acfg", "axfer", "afrz", "appl"],
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Fixed-length byte fields
// ---------------------------------------------------------------------------

/// Serde adapter for `[u8; N]` fields carried as binary strings.
///
/// serde's built-in array impl writes a sequence of integers; the ledger
/// codec wants a single `bin` value, and a wrong length must fail decoding.
pub(crate) mod fixed_bytes {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let buf = serde_bytes::ByteBuf::deserialize(deserializer)?;
        buf.as_slice()
            .try_into()
            .map_err(|_| D::Error::invalid_length(buf.len(), &"a fixed-length byte string"))
    }

    pub fn is_zero<const N: usize>(bytes: &[u8; N]) -> bool {
        bytes.iter().all(|b| *b == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_roundtrip() {
        for ty in [
            TransactionType::Payment,
            TransactionType::KeyRegistration,
            TransactionType::AssetConfig,
            TransactionType::AssetTransfer,
            TransactionType::AssetFreeze,
            TransactionType::ApplicationCall,
        ] {
            assert_eq!(TransactionType::from_wire(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn unknown_wire_name_rejected() {
        assert_eq!(TransactionType::from_wire("transfer"), None);
        assert_eq!(TransactionType::from_wire("PAY"), None);
        assert_eq!(TransactionType::from_wire(""), None);
    }

    #[test]
    fn payment_serializes_as_short_string() {
        let bytes = rmp_serde::to_vec(&TransactionType::Payment).unwrap();
        // fixstr of length 3, then "pay".
        assert_eq!(bytes, vec![0xa3, b'p', b'a', b'y']);
    }

    #[test]
    fn unknown_type_fails_to_decode() {
        let bytes = rmp_serde::to_vec("frobnicate").unwrap();
        assert!(rmp_serde::from_slice::<TransactionType>(&bytes).is_err());
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(TransactionType::AssetTransfer.to_string(), "axfer");
    }
}
