use rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};

use super::keys::Keypair;

/// Errors from envelope encryption and signing
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("encrypt failed: {0}")]
    Encrypt(rsa::Error),
    #[error("decrypt failed: {0}")]
    Decrypt(rsa::Error),
    #[error("sign failed: {0}")]
    Sign(rsa::Error),
}

/// Encrypt a plaintext envelope under the given public key.
///
/// The owner always encrypts for themself, so the public key here is the
/// caller's own. PKCS#1 v1.5 bounds the plaintext at modulus size minus 11
/// bytes; oversized envelopes fail with [`EnvelopeError::Encrypt`].
pub fn encrypt(public_key: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    let mut rng = rand::thread_rng();
    public_key
        .encrypt(&mut rng, Pkcs1v15Encrypt, plaintext)
        .map_err(EnvelopeError::Encrypt)
}

/// Decrypt a stored ciphertext with the owner's private key.
pub fn decrypt(keypair: &Keypair, ciphertext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    keypair
        .private_key()
        .decrypt(Pkcs1v15Encrypt, ciphertext)
        .map_err(EnvelopeError::Decrypt)
}

/// Single SHA-256. The digest behind "I authored this content" proofs:
/// Create, and the new payload of an Update.
pub fn content_digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// SHA-256 applied twice. The digest behind "I possess this stored content"
/// proofs: Delete, and the old payload of an Update.
///
/// The single/double asymmetry is wire protocol, not an implementation
/// accident. A content proof must never verify as a possession proof.
pub fn possession_digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(bytes)).into()
}

fn sign_digest(keypair: &Keypair, digest: &[u8; 32]) -> Result<Vec<u8>, EnvelopeError> {
    keypair
        .private_key()
        .sign(Pkcs1v15Sign::new::<Sha256>(), digest)
        .map_err(EnvelopeError::Sign)
}

fn verify_digest(public_key: &RsaPublicKey, digest: &[u8; 32], signature: &[u8]) -> bool {
    public_key
        .verify(Pkcs1v15Sign::new::<Sha256>(), digest, signature)
        .is_ok()
}

/// Sign the single hash of a ciphertext the caller authored.
pub fn sign_content(keypair: &Keypair, ciphertext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    sign_digest(keypair, &content_digest(ciphertext))
}

/// Sign the double hash of a ciphertext the caller claims to hold.
pub fn sign_possession(keypair: &Keypair, ciphertext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    sign_digest(keypair, &possession_digest(ciphertext))
}

/// Check a content proof against a public key.
pub fn verify_content(public_key: &RsaPublicKey, ciphertext: &[u8], signature: &[u8]) -> bool {
    verify_digest(public_key, &content_digest(ciphertext), signature)
}

/// Check a possession proof against a public key.
pub fn verify_possession(public_key: &RsaPublicKey, ciphertext: &[u8], signature: &[u8]) -> bool {
    verify_digest(public_key, &possession_digest(ciphertext), signature)
}
