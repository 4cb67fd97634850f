use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use super::identifier::Identifier;

/// Size of the Ed25519 seed that a signing key is built from
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Size of the expanded signing key material (seed || public key)
pub const KEYPAIR_SIZE: usize = 64;
/// Size of Ed25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("key derivation failed: {0}")]
    Derivation(String),
}

/// Public half of a mind's Ed25519 key pair
///
/// Externally a public key always travels as its 44-character standard base64
/// [`Identifier`]; this type holds the decoded bytes and is what signatures are
/// checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl From<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        PublicKey(bytes)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let buff: [u8; PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|_| {
            KeyError::InvalidInput(format!(
                "invalid public key size, expected {}, got {}",
                PUBLIC_KEY_SIZE,
                bytes.len()
            ))
        })?;
        Ok(buff.into())
    }
}

impl TryFrom<&Identifier> for PublicKey {
    type Error = KeyError;
    fn try_from(identifier: &Identifier) -> Result<Self, Self::Error> {
        Self::from_base64(identifier.as_str())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl PublicKey {
    /// Parse a public key from its standard base64 form
    pub fn from_base64(b64: &str) -> Result<Self, KeyError> {
        let bytes = STANDARD
            .decode(b64)
            .map_err(|e| KeyError::InvalidInput(format!("public key base64 decode error: {}", e)))?;
        Self::try_from(bytes.as_slice())
    }

    /// Convert public key to raw bytes
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }

    /// Convert public key to standard base64 (44 characters, padded)
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// The identifier this key is addressed by on the network
    pub fn to_identifier(&self) -> Identifier {
        Identifier::from(*self)
    }

    /// Verify an Ed25519 signature on a message.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The public key bytes are not a valid curve point
    /// - The signature verification fails
    pub fn verify(
        &self,
        msg: &[u8],
        signature: &ed25519_dalek::Signature,
    ) -> Result<(), ed25519_dalek::SignatureError> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)?;
        verifying_key.verify_strict(msg, signature)
    }
}

/// Private half of a derived key pair
///
/// Wraps an Ed25519 `SigningKey`, which zeroes its bytes on drop. Not `Clone`,
/// not serializable, and `Debug` is redacted.
pub struct SecretKey(SigningKey);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretKey").field(&"<redacted>").finish()
    }
}

impl SecretKey {
    /// Build a signing key from a 32-byte Ed25519 seed
    pub fn from_seed(seed: &[u8; PRIVATE_KEY_SIZE]) -> Self {
        Self(SigningKey::from_bytes(seed))
    }

    /// Derive the public key from this secret key
    pub fn public(&self) -> PublicKey {
        PublicKey(self.0.verifying_key().to_bytes())
    }

    /// The 64-byte signing key material (seed followed by public key)
    pub fn to_keypair_bytes(&self) -> Zeroizing<[u8; KEYPAIR_SIZE]> {
        Zeroizing::new(self.0.to_keypair_bytes())
    }

    /// Sign a message with this secret key using Ed25519.
    ///
    /// Returns a detached signature that can be verified with the corresponding public key.
    pub fn sign(&self, msg: &[u8]) -> ed25519_dalek::Signature {
        self.0.sign(msg)
    }
}

/// A derived signing key pair
///
/// Lives only for the duration of a derive-and-use operation. Dropping it
/// zeroes the private half.
#[derive(Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: SecretKey,
}

impl KeyPair {
    pub fn from_seed(seed: &[u8; PRIVATE_KEY_SIZE]) -> Self {
        let secret = SecretKey::from_seed(seed);
        Self {
            public: secret.public(),
            secret,
        }
    }

    /// Discard the private half, keeping only the public key
    pub fn into_public(self) -> PublicKey {
        self.public
    }
}
