//! The note field: `"<issuer> <expires-at-ms>"`.
//!
//! The note is the only part of an auth transaction the client chooses, and
//! it sits inside the signed bytes. The issuer ties the token to one
//! service; the expiry bounds its life. Neither can be changed without
//! re-signing.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NoteError {
    #[error("note is not valid UTF-8")]
    NotUtf8,

    #[error("note must have exactly two space-separated parts, found {0}")]
    WrongPartCount(usize),

    #[error("expiry is not a decimal integer")]
    InvalidExpiry,
}

/// Parsed note contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthNote {
    pub issuer: String,
    pub expires_at_ms: u64,
}

impl AuthNote {
    pub fn new(issuer: impl Into<String>, expires_at_ms: u64) -> Self {
        Self {
            issuer: issuer.into(),
            expires_at_ms,
        }
    }

    pub fn from_bytes(note: &[u8]) -> Result<Self, NoteError> {
        std::str::from_utf8(note)
            .map_err(|_| NoteError::NotUtf8)?
            .parse()
    }

    /// Strict parse. One separator, no trimming, digits only.
    pub fn parse(note: &str) -> Result<Self, NoteError> {
        let parts: Vec<&str> = note.split(' ').collect();
        let [issuer, expiry] = parts.as_slice() else {
            return Err(NoteError::WrongPartCount(parts.len()));
        };

        // u64::from_str accepts a leading '+'; the wire form does not.
        if expiry.is_empty() || !expiry.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NoteError::InvalidExpiry);
        }
        let expires_at_ms = expiry.parse().map_err(|_| NoteError::InvalidExpiry)?;

        Ok(Self::new(*issuer, expires_at_ms))
    }
}

impl FromStr for AuthNote {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AuthNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.issuer, self.expires_at_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_form() {
        let note = AuthNote::parse("https://stateless-auth.vercel.app/ 1700000000000").unwrap();
        assert_eq!(note.issuer, "https://stateless-auth.vercel.app/");
        assert_eq!(note.expires_at_ms, 1_700_000_000_000);
    }

    #[test]
    fn display_is_inverse_of_parse() {
        let note = AuthNote::new("example", 1_999_999_999_999);
        assert_eq!(note.to_string(), "example 1999999999999");
        assert_eq!(AuthNote::parse(&note.to_string()).unwrap(), note);
    }

    #[test]
    fn rejects_missing_expiry() {
        assert_eq!(AuthNote::parse("example"), Err(NoteError::WrongPartCount(1)));
        assert_eq!(AuthNote::parse("example "), Err(NoteError::InvalidExpiry));
    }

    #[test]
    fn rejects_extra_spaces() {
        assert_eq!(
            AuthNote::parse("example  1700000000000"),
            Err(NoteError::WrongPartCount(3))
        );
        assert_eq!(
            AuthNote::parse("example 1700000000000 extra"),
            Err(NoteError::WrongPartCount(3))
        );
        assert!(AuthNote::parse(" example 1700000000000").is_err());
    }

    #[test]
    fn rejects_non_digit_expiry() {
        for bad in ["example +1700", "example -1700", "example 17e3", "example 0x10", "example 1.5"] {
            assert_eq!(AuthNote::parse(bad), Err(NoteError::InvalidExpiry), "{bad}");
        }
    }

    #[test]
    fn rejects_overflowing_expiry() {
        assert_eq!(
            AuthNote::parse("example 99999999999999999999999"),
            Err(NoteError::InvalidExpiry)
        );
    }

    #[test]
    fn rejects_non_utf8() {
        assert_eq!(AuthNote::from_bytes(&[0xc3, 0x28]), Err(NoteError::NotUtf8));
    }

    #[test]
    fn empty_issuer_parses() {
        // Caught later by the issuer pin, not here.
        let note = AuthNote::parse(" 5").unwrap();
        assert_eq!(note.issuer, "");
    }

    #[test]
    fn tab_is_not_a_separator() {
        assert_eq!(
            AuthNote::parse("example\t1700000000000"),
            Err(NoteError::WrongPartCount(1))
        );
    }
}
