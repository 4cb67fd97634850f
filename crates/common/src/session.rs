use crate::consideration::{
    Consideration, ConsiderationError, ConsiderationSigner, PLOTS_UNTIL_NEW_SERIES,
};
use crate::crypto::{derive_public_keys, Identifier, KeyError};
use crate::graph::{self, Graph};

/// Tunables a [`Session`] is created with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub plots_until_new_series: u64,
    /// Percentage in `[0, 100]`
    pub ranking_filter: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            plots_until_new_series: PLOTS_UNTIL_NEW_SERIES,
            ranking_filter: 0.0,
        }
    }
}

/// Public state of an imported mind
///
/// A session only ever holds public identifiers. Signing takes the passphrase
/// again and re-derives the selected key for the duration of the call.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    public_keys: Vec<Identifier>,
    selected: Option<usize>,
    ranking_filter: f64,
    signer: ConsiderationSigner,
}

fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            public_keys: Vec::new(),
            selected: None,
            ranking_filter: clamp_percent(config.ranking_filter),
            signer: ConsiderationSigner::new(config.plots_until_new_series),
        }
    }

    /// Restore a session from identifiers imported earlier
    pub fn with_public_keys(config: SessionConfig, public_keys: Vec<Identifier>) -> Self {
        let mut session = Self::new(config);
        session.selected = if public_keys.is_empty() { None } else { Some(0) };
        session.public_keys = public_keys;
        session
    }

    /// Derive `count` keys and keep their public identifiers
    ///
    /// Replaces any previously imported mind and selects the first key.
    pub fn import_mind(&mut self, passphrase: &str, count: usize) -> Result<(), KeyError> {
        let public_keys = derive_public_keys(passphrase, count)?;
        self.public_keys = public_keys.iter().map(|key| key.to_identifier()).collect();
        self.selected = Some(0);
        tracing::info!(count, "imported mind");
        Ok(())
    }

    pub fn forget_mind(&mut self) {
        self.public_keys.clear();
        self.selected = None;
        tracing::info!("forgot mind");
    }

    pub fn has_mind(&self) -> bool {
        !self.public_keys.is_empty()
    }

    pub fn public_keys(&self) -> &[Identifier] {
        &self.public_keys
    }

    pub fn select_key(&mut self, index: usize) -> Result<(), KeyError> {
        if index >= self.public_keys.len() {
            return Err(KeyError::InvalidInput(format!(
                "key index {} out of range, {} keys imported",
                index,
                self.public_keys.len()
            )));
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_key(&self) -> Option<&Identifier> {
        self.selected.and_then(|index| self.public_keys.get(index))
    }

    pub fn ranking_filter(&self) -> f64 {
        self.ranking_filter
    }

    /// Set the ranking filter, clamped to `[0, 100]`
    pub fn set_ranking_filter(&mut self, percent: f64) {
        self.ranking_filter = clamp_percent(percent);
    }

    pub fn plots_until_new_series(&self) -> u64 {
        self.signer.plots_until_new_series()
    }

    /// Sign with the selected key
    ///
    /// The passphrase must re-derive the identity that was imported.
    pub fn sign(
        &self,
        for_: &str,
        memo: &str,
        tip_height: u64,
        passphrase: &str,
    ) -> Result<Consideration, ConsiderationError> {
        let (index, expected) = match (self.selected, self.selected_key()) {
            (Some(index), Some(key)) => (index, key),
            _ => {
                return Err(ConsiderationError::InvalidInput(
                    "no mind imported".to_string(),
                ))
            }
        };

        let consideration = self
            .signer
            .sign(for_, memo, tip_height, index, passphrase)?;
        if consideration.by() != expected {
            tracing::warn!(index, "passphrase does not match imported mind");
            return Err(KeyError::Derivation(
                "passphrase does not derive the imported key".to_string(),
            )
            .into());
        }
        Ok(consideration)
    }

    /// Build a graph around `focal_key` using the session's ranking filter
    pub fn build_graph(&self, graph_text: &str, focal_key: &str) -> Graph {
        graph::build(graph_text, focal_key, self.ranking_filter)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
