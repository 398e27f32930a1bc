//! # Transaction Module
//!
//! The auth transaction, its canonical ledger codec, and the signer
//! capability that turns it into a signed token.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    - TransactionType wire names, fixed-length byte fields
//! builder.rs  - AuthTransaction and the policy-seeded builder
//! codec.rs    - Canonical MessagePack + base64 token encoding
//! signing.rs  - TransactionSigner trait and the in-process LocalSigner
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: [`AuthTransactionBuilder`] fills every pinned field from
//!    the policy; the caller supplies the note.
//! 2. **Sign**: [`AuthTransaction::bytes_to_sign`] goes to a
//!    [`TransactionSigner`].
//! 3. **Encode**: [`SignedAuthTransaction::to_token`].
//! 4. **Decode**: the verifier runs [`SignedAuthTransaction::from_token`]
//!    and re-derives the signing bytes from the decoded transaction.

pub mod builder;
pub mod codec;
pub mod signing;
pub mod types;

pub use builder::{AuthTransaction, AuthTransactionBuilder};
pub use codec::{CodecError, SignedAuthTransaction};
pub use signing::{LocalSigner, SignerError, TransactionSigner};
pub use types::TransactionType;
