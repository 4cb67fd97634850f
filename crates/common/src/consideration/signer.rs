use rand::Rng;
use time::OffsetDateTime;

use super::{
    series_for_height, Consideration, ConsiderationError, NONCE_BOUND, PLOTS_UNTIL_NEW_SERIES,
};
use crate::crypto::{with_key, Identifier};

/// Builds and signs considerations with a freshly re-derived key
///
/// The signer holds no key material. Each call derives the key at
/// `key_index` from the passphrase, signs, and drops it before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsiderationSigner {
    plots_until_new_series: u64,
}

impl Default for ConsiderationSigner {
    fn default() -> Self {
        Self {
            plots_until_new_series: PLOTS_UNTIL_NEW_SERIES,
        }
    }
}

impl ConsiderationSigner {
    pub fn new(plots_until_new_series: u64) -> Self {
        Self {
            plots_until_new_series,
        }
    }

    pub fn plots_until_new_series(&self) -> u64 {
        self.plots_until_new_series
    }

    /// Sign a consideration stamped with the current time and a random nonce
    pub fn sign(
        &self,
        for_: &str,
        memo: &str,
        tip_height: u64,
        key_index: usize,
        passphrase: &str,
    ) -> Result<Consideration, ConsiderationError> {
        let time = OffsetDateTime::now_utc().unix_timestamp();
        let nonce = rand::rng().random_range(0..NONCE_BOUND);
        self.sign_at(for_, memo, tip_height, key_index, passphrase, time, nonce)
    }

    /// Sign a consideration with an explicit time and nonce
    #[allow(clippy::too_many_arguments)]
    pub fn sign_at(
        &self,
        for_: &str,
        memo: &str,
        tip_height: u64,
        key_index: usize,
        passphrase: &str,
        time: i64,
        nonce: u32,
    ) -> Result<Consideration, ConsiderationError> {
        let for_ = for_
            .parse::<Identifier>()
            .map_err(|e| ConsiderationError::InvalidInput(e.to_string()))?;
        let series = series_for_height(tip_height, self.plots_until_new_series).ok_or_else(|| {
            ConsiderationError::InvalidInput(
                "plots until new series must be positive".to_string(),
            )
        })?;

        let signed = with_key(passphrase, key_index, |pair| {
            Consideration::new(time, nonce, pair.public.to_identifier(), for_, memo, series)?
                .sign(&pair.secret)
        })??;

        tracing::debug!(
            by = %signed.by(),
            for_ = %signed.for_(),
            series,
            "signed consideration"
        );
        Ok(signed)
    }
}

/// Sign with the default series length
///
/// See [`ConsiderationSigner::sign`].
pub fn sign(
    for_: &str,
    memo: &str,
    tip_height: u64,
    key_index: usize,
    passphrase: &str,
) -> Result<Consideration, ConsiderationError> {
    ConsiderationSigner::default().sign(for_, memo, tip_height, key_index, passphrase)
}

/// Whether `consideration` carries a valid signature by its `by` identity
pub fn verify(consideration: &Consideration) -> bool {
    consideration.verify().is_ok()
}
