//! Passphrase to recovery phrase
//!
//! The passphrase is hashed with SHA3-256 and the 32-byte digest is used as
//! BIP39 entropy, giving a 24-word English recovery phrase. No entropy source
//! is consulted: the same passphrase always yields the same phrase.
//!
//! An empty passphrase is accepted and maps to a fixed phrase like any other
//! input; rejecting weak passphrases is left to the caller.

use bip39::{Language, Mnemonic};
use sha3::{Digest, Sha3_256};
use zeroize::{Zeroize, Zeroizing};

use super::keys::KeyError;

/// Derive the BIP39 mnemonic for a passphrase
pub(crate) fn derive_mnemonic(passphrase: &str) -> Result<Mnemonic, KeyError> {
    let mut entropy = Sha3_256::digest(passphrase.as_bytes());
    let mnemonic = Mnemonic::from_entropy(&entropy, Language::English)
        .map_err(|e| KeyError::Derivation(format!("mnemonic encoding failed: {}", e)));
    entropy.as_mut_slice().zeroize();
    mnemonic
}

/// Derive the recovery phrase for a passphrase
///
/// The returned phrase is wiped from memory when dropped.
pub fn derive_phrase(passphrase: &str) -> Result<Zeroizing<String>, KeyError> {
    let mnemonic = derive_mnemonic(passphrase)?;
    Ok(Zeroizing::new(mnemonic.phrase().to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_phrase_is_deterministic() {
        let a = derive_phrase("correct horse").unwrap();
        let b = derive_phrase("correct horse").unwrap();
        assert_eq!(*a, *b);
        assert_eq!(a.split_whitespace().count(), 24);
    }

    #[test]
    fn test_phrase_golden() {
        let phrase = derive_phrase("correct horse").unwrap();
        assert_eq!(
            phrase.as_str(),
            "tired sure palace carbon sister visa ocean merry attend riot slab radio \
             blur clock cliff junk give plastic other invite typical market vicious intact"
        );
    }

    #[test]
    fn test_distinct_passphrases_diverge() {
        let a = derive_phrase("correct horse").unwrap();
        let b = derive_phrase("correct horse ").unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_empty_passphrase_is_allowed() {
        let phrase = derive_phrase("").unwrap();
        assert!(phrase.starts_with("pony wreck sail lawsuit"));
        assert_eq!(*phrase, *derive_phrase("").unwrap());
    }
}
