use clap::Args;

use common::crypto::{derive_phrase, KeyError};

use crate::cli::passphrase::{PassphraseArgs, PassphraseError};
use crate::state::StateError;

use super::format_keys;

#[derive(Args, Debug, Clone)]
pub struct Import {
    #[command(flatten)]
    pub passphrase: PassphraseArgs,

    /// Number of keys to derive (defaults to the configured key count)
    #[arg(long)]
    pub count: Option<usize>,

    /// Also print the 24-word recovery phrase
    #[arg(long)]
    pub show_phrase: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
    #[error(transparent)]
    Passphrase(#[from] PassphraseError),
    #[error("import failed: {0}")]
    Key(#[from] KeyError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Import {
    type Error = ImportError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let passphrase = self.passphrase.read().await?;
        let count = self.count.unwrap_or(state.config.key_count);

        let mut session = state.session()?;
        session.import_mind(&passphrase, count)?;
        state.store_session(&session)?;

        let keys = format_keys(session.public_keys(), session.selected_index());
        if self.show_phrase {
            let phrase = derive_phrase(&passphrase)?;
            Ok(format!("{}\n\n{}", phrase.as_str(), keys))
        } else {
            Ok(keys)
        }
    }
}
