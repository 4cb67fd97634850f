//! Hierarchical key derivation for a mind
//!
//! A mind is the ordered sequence of key pairs derived from one passphrase:
//!
//! 1. `phrase = derive_phrase(passphrase)`
//! 2. `seed = BIP39 seed of phrase` (empty extension passphrase)
//! 3. for each index `i`: `material = SHA-512(seed || utf8(decimal(i)))` and
//!    key pair `i` is the Ed25519 pair whose seed is `material[0..32]`
//!
//! Key `i` depends only on the passphrase and `i`, never on how many keys were
//! requested, so a shorter derivation is always a prefix of a longer one.

use bip39::Seed;
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, Zeroizing};

use super::keys::{KeyError, KeyPair, PublicKey, PRIVATE_KEY_SIZE};
use super::mnemonic::derive_mnemonic;

/// Number of keys shown when a mind is imported
pub const DEFAULT_KEY_COUNT: usize = 10;

fn derive_key_at(seed: &[u8], index: usize) -> KeyPair {
    let mut material = Sha512::new()
        .chain_update(seed)
        .chain_update(index.to_string().as_bytes())
        .finalize();

    let mut key_seed = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
    key_seed.copy_from_slice(&material[..PRIVATE_KEY_SIZE]);
    material.as_mut_slice().zeroize();

    KeyPair::from_seed(&key_seed)
}

fn derive_seed(passphrase: &str) -> Result<Seed, KeyError> {
    let mnemonic = derive_mnemonic(passphrase)?;
    Ok(Seed::new(&mnemonic, ""))
}

/// Derive the first `count` key pairs of the mind behind `passphrase`
///
/// # Errors
///
/// Returns `InvalidInput` if `count` is zero.
pub fn derive_keys(passphrase: &str, count: usize) -> Result<Vec<KeyPair>, KeyError> {
    if count == 0 {
        return Err(KeyError::InvalidInput(
            "key count must be greater than zero".to_string(),
        ));
    }

    let seed = derive_seed(passphrase)?;
    let keys = (0..count)
        .map(|index| derive_key_at(seed.as_bytes(), index))
        .collect();

    tracing::debug!(count, "derived mind key pairs");
    Ok(keys)
}

/// Derive only the public keys, dropping every private half before returning
pub fn derive_public_keys(passphrase: &str, count: usize) -> Result<Vec<PublicKey>, KeyError> {
    Ok(derive_keys(passphrase, count)?
        .into_iter()
        .map(KeyPair::into_public)
        .collect())
}

/// Run `f` with the key pair at `index`
///
/// Derives `index + 1` pairs, hands the one at `index` to `f`, and drops all
/// of them (zeroing the private halves) once `f` returns, whether it succeeded
/// or not.
pub fn with_key<T, F>(passphrase: &str, index: usize, f: F) -> Result<T, KeyError>
where
    F: FnOnce(&KeyPair) -> T,
{
    let count = index
        .checked_add(1)
        .ok_or_else(|| KeyError::InvalidInput(format!("key index {} out of range", index)))?;
    let keys = derive_keys(passphrase, count)?;
    let pair = keys.get(index).ok_or_else(|| {
        KeyError::Derivation(format!("no key pair derived for index {}", index))
    })?;
    Ok(f(pair))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_zero_count_is_rejected() {
        assert!(matches!(
            derive_keys("correct horse", 0),
            Err(KeyError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_prefix_stability() {
        let long = derive_public_keys("correct horse", 10).unwrap();
        let short = derive_public_keys("correct horse", 3).unwrap();
        assert_eq!(&long[..3], &short[..]);
    }

    #[test]
    fn test_keys_are_distinct() {
        let keys = derive_public_keys("correct horse", 5).unwrap();
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_with_key_selects_index() {
        let keys = derive_public_keys("correct horse", 3).unwrap();
        let public = with_key("correct horse", 2, |pair| pair.public).unwrap();
        assert_eq!(public, keys[2]);
    }

    #[test]
    fn test_secret_matches_public() {
        let pairs = derive_keys("correct horse", 2).unwrap();
        for pair in &pairs {
            assert_eq!(pair.secret.public(), pair.public);
        }
    }
}
