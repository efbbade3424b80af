/**
 * Cryptographic types and operations.
 *  - RSA keypair generation, persistence, and loading
 *  - The encryption envelope and the two signature
 *    proof schemes (content vs. possession)
 */
pub mod crypto;
/**
 * The closed family of typed secret entries and the
 *  wire envelope they are packed into before encryption.
 */
pub mod entry;

pub mod prelude {
    pub use crate::crypto::envelope::{
        content_digest, possession_digest, sign_content, sign_possession, verify_content,
        verify_possession, EnvelopeError,
    };
    pub use crate::crypto::keys::{KeyError, Keypair, OwnerKey};
    pub use crate::entry::{Entry, EntryError, EntryRecord};
}
