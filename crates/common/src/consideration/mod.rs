//! # Considerations
//!
//! A consideration is a signed record in which one mind (`by`) directs a memo
//! toward an identifier (`for`), scoped to a series epoch.
//!
//! ## Identity
//!
//! A consideration is identified by its [`ConsiderationId`]: the SHA3-256 hash
//! of its canonical form, not by its signature. The canonical form is the
//! compact JSON object
//!
//! ```text
//! {"time":…,"nonce":…,"by":"…","for":"…","memo":"…","series":…}
//! ```
//!
//! with exactly these six fields in exactly this order. Any other client must
//! produce the same bytes for the same values or ids and signatures diverge.
//!
//! ## Signing
//!
//! The signature is an Ed25519 signature over the 32 raw hash bytes (not the
//! hex rendering, not the canonical text). See [`sign`] and [`verify`].

mod signer;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::crypto::{Identifier, KeyError, PublicKey, SecretKey, Signature};

pub use signer::{sign, verify, ConsiderationSigner};

/// Number of plots (blocks) in one series epoch
pub const PLOTS_UNTIL_NEW_SERIES: u64 = 1008;
/// Maximum memo length, in characters
pub const MAX_MEMO_LENGTH: usize = 150;
/// Exclusive upper bound of a consideration nonce (2^31 - 1)
pub const NONCE_BOUND: u32 = i32::MAX as u32;
/// Size of a consideration id in bytes
pub const CONSIDERATION_ID_SIZE: usize = 32;

static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("ref/([a-fA-F0-9]+)/").expect("reference pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum ConsiderationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("key derivation failed: {0}")]
    Derivation(#[from] KeyError),
    #[error("consideration is already signed")]
    AlreadySigned,
    #[error("consideration is not signed")]
    Unsigned,
    #[error("signature verification failed: {0}")]
    Signature(String),
    #[error("canonical encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The series a consideration belongs to, given the current tip height
///
/// Returns `None` when `plots_until_new_series` is zero.
pub fn series_for_height(tip_height: u64, plots_until_new_series: u64) -> Option<u64> {
    tip_height
        .checked_div(plots_until_new_series)
        .map(|epoch| epoch + 1)
}

/// Content hash of a consideration's canonical form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsiderationId([u8; CONSIDERATION_ID_SIZE]);

impl ConsiderationId {
    pub fn as_bytes(&self) -> &[u8; CONSIDERATION_ID_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, ConsiderationError> {
        let mut buff = [0; CONSIDERATION_ID_SIZE];
        hex::decode_to_slice(hex, &mut buff).map_err(|e| {
            ConsiderationError::InvalidInput(format!("consideration id hex decode error: {}", e))
        })?;
        Ok(Self(buff))
    }
}

impl fmt::Display for ConsiderationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ConsiderationId {
    type Err = ConsiderationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for ConsiderationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ConsiderationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

/// The hashed subset of a consideration, in protocol field order
#[derive(Serialize)]
struct CanonicalConsideration<'a> {
    time: i64,
    nonce: u32,
    by: &'a str,
    #[serde(rename = "for")]
    for_: &'a str,
    memo: &'a str,
    series: u64,
}

/// A consideration record, as carried on the wire
///
/// Fields are read-only once constructed; the only transition is
/// unsigned → signed via [`Consideration::sign`]. Deserializing goes
/// through [`Consideration::new`], so decoded records obey the same bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireConsideration")]
pub struct Consideration {
    time: i64,
    nonce: u32,
    by: Identifier,
    #[serde(rename = "for")]
    for_: Identifier,
    memo: String,
    series: u64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "signature_base64"
    )]
    signature: Option<Signature>,
}

#[derive(Deserialize)]
struct WireConsideration {
    time: i64,
    nonce: u32,
    by: Identifier,
    #[serde(rename = "for")]
    for_: Identifier,
    memo: String,
    series: u64,
    #[serde(default, with = "signature_base64")]
    signature: Option<Signature>,
}

impl TryFrom<WireConsideration> for Consideration {
    type Error = ConsiderationError;

    fn try_from(wire: WireConsideration) -> Result<Self, Self::Error> {
        let mut consideration = Self::new(
            wire.time,
            wire.nonce,
            wire.by,
            wire.for_,
            wire.memo,
            wire.series,
        )?;
        consideration.signature = wire.signature;
        Ok(consideration)
    }
}

impl Consideration {
    /// Build an unsigned consideration
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the memo is longer than [`MAX_MEMO_LENGTH`]
    /// characters, the nonce is not below [`NONCE_BOUND`], or the series is zero.
    pub fn new(
        time: i64,
        nonce: u32,
        by: Identifier,
        for_: Identifier,
        memo: impl Into<String>,
        series: u64,
    ) -> Result<Self, ConsiderationError> {
        let memo = memo.into();
        let memo_length = memo.chars().count();
        if memo_length > MAX_MEMO_LENGTH {
            return Err(ConsiderationError::InvalidInput(format!(
                "memo is {} characters, at most {} allowed",
                memo_length, MAX_MEMO_LENGTH
            )));
        }
        if nonce >= NONCE_BOUND {
            return Err(ConsiderationError::InvalidInput(format!(
                "nonce {} out of range",
                nonce
            )));
        }
        if series == 0 {
            return Err(ConsiderationError::InvalidInput(
                "series must be positive".to_string(),
            ));
        }

        Ok(Self {
            time,
            nonce,
            by,
            for_,
            memo,
            series,
            signature: None,
        })
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    pub fn by(&self) -> &Identifier {
        &self.by
    }

    pub fn for_(&self) -> &Identifier {
        &self.for_
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn series(&self) -> u64 {
        self.series
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The canonical text that the id is computed over
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, ConsiderationError> {
        let canonical = CanonicalConsideration {
            time: self.time,
            nonce: self.nonce,
            by: self.by.as_str(),
            for_: self.for_.as_str(),
            memo: &self.memo,
            series: self.series,
        };
        Ok(serde_json::to_vec(&canonical)?)
    }

    /// SHA3-256 of the canonical form
    pub fn id(&self) -> Result<ConsiderationId, ConsiderationError> {
        let digest = Sha3_256::digest(self.canonical_bytes()?);
        let mut buff = [0; CONSIDERATION_ID_SIZE];
        buff.copy_from_slice(&digest);
        Ok(ConsiderationId(buff))
    }

    /// Sign the raw id bytes with `secret`
    ///
    /// # Errors
    ///
    /// Returns `AlreadySigned` if a signature is present, and `InvalidInput`
    /// if `secret` does not belong to the `by` identity.
    pub fn sign(mut self, secret: &SecretKey) -> Result<Self, ConsiderationError> {
        if self.signature.is_some() {
            return Err(ConsiderationError::AlreadySigned);
        }
        if secret.public().to_identifier() != self.by {
            return Err(ConsiderationError::InvalidInput(
                "signing key does not match the consideration's author".to_string(),
            ));
        }

        let id = self.id()?;
        self.signature = Some(secret.sign(id.as_bytes()));
        Ok(self)
    }

    /// Check the signature against the `by` identity
    pub fn verify(&self) -> Result<(), ConsiderationError> {
        let signature = self.signature.as_ref().ok_or(ConsiderationError::Unsigned)?;
        let author = PublicKey::try_from(&self.by)
            .map_err(|e| ConsiderationError::Signature(e.to_string()))?;
        let id = self.id()?;
        author
            .verify(id.as_bytes(), signature)
            .map_err(|e| ConsiderationError::Signature(e.to_string()))
    }

    /// The first consideration id referenced in the memo as `ref/<hex>/`
    pub fn embedded_reference(&self) -> Option<&str> {
        REFERENCE_REGEX
            .captures(&self.memo)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    }
}

mod signature_base64 {
    use super::*;

    pub fn serialize<S: Serializer>(
        signature: &Option<Signature>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match signature {
            Some(signature) => serializer.serialize_str(&STANDARD.encode(signature.to_bytes())),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Signature>, D::Error> {
        let Some(encoded) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let bytes = STANDARD.decode(&encoded).map_err(serde::de::Error::custom)?;
        Signature::from_slice(&bytes)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
