//! # Token Module
//!
//! The bearer token protocol on both sides of the wire.
//!
//! ```text
//! note.rs        - "<issuer> <expiry-ms>" parsing and formatting
//! constructor.rs - TokenBuilder: policy + signer -> token
//! verifier.rs    - TokenVerifier: token + claimed identity -> yes/no
//! error.rs       - AuthError and BuildError
//! ```
//!
//! The only thing the two sides share is the [`AuthPolicy`](crate::config::AuthPolicy).

pub mod constructor;
pub mod error;
pub mod note;
pub mod verifier;

pub use constructor::{build_token, TokenBuilder};
pub use error::{AuthError, BuildError};
pub use note::{AuthNote, NoteError};
pub use verifier::{authenticate, TokenVerifier, VerificationStage, VerifiedToken};
