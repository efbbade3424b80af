//! Cryptographic primitives for Keepsake
//!
//! This module provides the cryptographic foundation for Keepsake's security model:
//!
//! - **Identity**: RSA-4096 keypairs; the public modulus is the user's sole identity,
//!   there is no separate account or registration step.
//! - **Confidentiality**: every entry is encrypted by its owner, for its owner, with
//!   RSA PKCS#1 v1.5. The server only ever sees ciphertext.
//! - **Authorization**: mutations are authorized by PKCS#1 v1.5 signatures over
//!   SHA-256 digests of ciphertext, verified server-side against the owner modulus.
//!
//! # Proof schemes
//!
//! Two digest constructions are used on the wire and must never be unified:
//!
//! - *content* proof: a single SHA-256 of a ciphertext. Asserts "I authored these
//!   bytes". Used for Create and for the new payload of an Update.
//! - *possession* proof: SHA-256 applied twice. Asserts "I hold the bytes the
//!   server currently stores". Used for Delete and for the old payload of an Update.
//!
//! PKCS#1 v1.5 padding (rather than OAEP/PSS) is a legacy wire-compatibility
//! requirement of the protocol.

pub mod envelope;
pub mod keys;

pub use envelope::EnvelopeError;
pub use keys::{KeyError, Keypair, OwnerKey};
