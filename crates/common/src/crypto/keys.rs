use std::path::{Path, PathBuf};

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use tokio_util::sync::CancellationToken;

/// RSA modulus size for newly generated keys, sized for long-term margin.
pub const KEY_SIZE: usize = 4096;
/// Fixed public exponent; never transmitted, both sides assume it.
pub const PUBLIC_EXPONENT: u32 = 65537;

const PEM_TAG: &str = "RSA PRIVATE KEY";
const FILE_NAME_TAIL: usize = 16;

/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("operation cancelled")]
    Cancelled,
    #[error("key generation failed: {0}")]
    Generation(rsa::Error),
    #[error("key encoding failed: {0}")]
    Encoding(rsa::pkcs1::Error),
    #[error("wrong key block format")]
    Format,
    #[error("key parse failed: {0}")]
    Parse(rsa::pkcs1::Error),
    #[error("key file io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid owner key: {0}")]
    InvalidOwnerKey(rsa::Error),
}

/// A user's public identity: the raw big-endian bytes of their RSA modulus.
///
/// This is the only identity the server ever sees. The public exponent is the
/// fixed constant [`PUBLIC_EXPONENT`] and is never sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerKey(Vec<u8>);

impl OwnerKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.clone()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Reassemble the full RSA public key from the modulus bytes.
    ///
    /// Fails for byte strings that do not form a usable modulus.
    pub fn to_public_key(&self) -> Result<RsaPublicKey, KeyError> {
        let n = BigUint::from_bytes_be(&self.0);
        let e = BigUint::from(PUBLIC_EXPONENT);
        RsaPublicKey::new(n, e).map_err(KeyError::InvalidOwnerKey)
    }
}

impl From<Vec<u8>> for OwnerKey {
    fn from(bytes: Vec<u8>) -> Self {
        OwnerKey(bytes)
    }
}

impl From<&RsaPublicKey> for OwnerKey {
    fn from(key: &RsaPublicKey) -> Self {
        OwnerKey(key.n().to_bytes_be())
    }
}

/// The user's RSA keypair. Owned exclusively by the client process that
/// generated or loaded it; the private half never leaves the key file.
#[derive(Debug, Clone)]
pub struct Keypair {
    inner: RsaPrivateKey,
}

impl Keypair {
    /// Generate a fresh 4096-bit keypair and persist it as a PKCS#1 PEM file
    /// under `dir`.
    ///
    /// The file name is the hex of the last [`FILE_NAME_TAIL`] bytes of the
    /// PKCS#1 DER encoding. That makes names collision-resistant enough to
    /// keep several keys in one directory; it carries no security weight.
    ///
    /// The cancellation token is checked before any work starts.
    pub fn generate(cancel: &CancellationToken, dir: &Path) -> Result<(Self, PathBuf), KeyError> {
        if cancel.is_cancelled() {
            return Err(KeyError::Cancelled);
        }

        let mut rng = rand::thread_rng();
        let inner = RsaPrivateKey::new(&mut rng, KEY_SIZE).map_err(KeyError::Generation)?;

        let der = inner.to_pkcs1_der().map_err(KeyError::Encoding)?;
        let der_bytes = der.as_bytes();
        let tail = &der_bytes[der_bytes.len() - FILE_NAME_TAIL..];
        let path = dir.join(format!("{}.pem", hex::encode(tail)));

        let pem = inner
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(KeyError::Encoding)?;
        std::fs::write(&path, pem.as_bytes())?;

        Ok((Self { inner }, path))
    }

    /// Load a previously persisted keypair from a PKCS#1 PEM file.
    ///
    /// The cancellation token is checked before any I/O.
    pub fn load(cancel: &CancellationToken, path: &Path) -> Result<Self, KeyError> {
        if cancel.is_cancelled() {
            return Err(KeyError::Cancelled);
        }

        let bytes = std::fs::read(path)?;
        let block = pem::parse(&bytes).map_err(|_| KeyError::Format)?;
        if block.tag() != PEM_TAG {
            return Err(KeyError::Format);
        }

        let inner = RsaPrivateKey::from_pkcs1_der(block.contents()).map_err(KeyError::Parse)?;
        Ok(Self { inner })
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.inner
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.inner.to_public_key()
    }

    /// The identity this keypair presents to the server.
    pub fn owner_key(&self) -> OwnerKey {
        OwnerKey::from(&self.public_key())
    }
}

impl From<RsaPrivateKey> for Keypair {
    fn from(inner: RsaPrivateKey) -> Self {
        Self { inner }
    }
}
