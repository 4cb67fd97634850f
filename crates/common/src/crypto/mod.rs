//! Cryptographic primitives for minds
//!
//! This module provides the identity half of the client core:
//!
//! - **Recovery phrase**: a passphrase is hashed with SHA3-256 and encoded as a
//!   24-word BIP39 phrase ([`derive_phrase`])
//! - **Key derivation**: the phrase's BIP39 seed yields an ordered sequence of
//!   Ed25519 key pairs, one per index ([`derive_keys`])
//! - **Identifiers**: public keys and ideals are addressed by 44-character
//!   standard base64 strings ([`Identifier`])
//!
//! # Key Lifetime
//!
//! Neither the passphrase nor any private key is stored. Private keys are
//! re-derived from the passphrase for each signing operation and wiped when
//! the owning [`KeyPair`] is dropped; [`with_key`] scopes that lifetime to a
//! single closure.

mod identifier;
mod keys;
mod mind;
mod mnemonic;

pub use ed25519_dalek::Signature;
pub use identifier::{Identifier, IdentifierError, IDENTIFIER_LEN};
pub use keys::{KeyError, KeyPair, PublicKey, SecretKey, KEYPAIR_SIZE, PUBLIC_KEY_SIZE};
pub use mind::{derive_keys, derive_public_keys, with_key, DEFAULT_KEY_COUNT};
pub use mnemonic::derive_phrase;
