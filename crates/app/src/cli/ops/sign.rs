use clap::Args;

use common::consideration::ConsiderationError;
use common::crypto::KeyError;

use crate::cli::passphrase::{PassphraseArgs, PassphraseError};
use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Sign {
    /// Identifier the consideration is for
    #[arg(long = "for")]
    pub for_: String,

    /// Memo, at most 150 characters
    #[arg(long, default_value = "")]
    pub memo: String,

    /// Height of the current chain tip
    #[arg(long)]
    pub tip_height: u64,

    /// Sign with this key instead of the selected one
    #[arg(long)]
    pub key_index: Option<usize>,

    #[command(flatten)]
    pub passphrase: PassphraseArgs,
}

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
    #[error(transparent)]
    Passphrase(#[from] PassphraseError),
    #[error("{0}")]
    Key(#[from] KeyError),
    #[error("signing failed: {0}")]
    Consideration(#[from] ConsiderationError),
    #[error("failed to encode consideration: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Sign {
    type Error = SignError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut session = ctx.state()?.session()?;
        if let Some(index) = self.key_index {
            session.select_key(index)?;
        }

        let passphrase = self.passphrase.read().await?;
        let consideration = session.sign(&self.for_, &self.memo, self.tip_height, &passphrase)?;
        let id = consideration.id()?;
        tracing::info!(%id, series = consideration.series(), "signed consideration");

        Ok(serde_json::to_string_pretty(&consideration)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::op::{Op, OpContext};
    use crate::state::{AppConfig, AppState};
    use common::consideration::Consideration;

    const IDEAL: &str = "ideaL00000000000000000000000000000000000000=";

    fn sign(key_index: Option<usize>, passphrase: &str) -> Sign {
        Sign {
            for_: IDEAL.to_string(),
            memo: "thanks".to_string(),
            tip_height: 250,
            key_index,
            passphrase: PassphraseArgs {
                passphrase: Some(passphrase.to_string()),
            },
        }
    }

    fn ctx_with_mind(temp: &tempfile::TempDir) -> OpContext {
        let path = temp.path().join("mind");
        let config = AppConfig {
            plots_until_new_series: 100,
            ..AppConfig::default()
        };
        let state = AppState::init(Some(path.clone()), Some(config)).unwrap();
        let mut session = state.session().unwrap();
        session.import_mind("correct horse", 3).unwrap();
        state.store_session(&session).unwrap();
        OpContext::new(Some(path))
    }

    #[tokio::test]
    async fn test_sign_outputs_verifiable_json() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = ctx_with_mind(&temp);

        let output = sign(Some(2), "correct horse").execute(&ctx).await.unwrap();
        let consideration: Consideration = serde_json::from_str(&output).unwrap();
        assert!(consideration.verify().is_ok());
        assert_eq!(consideration.series(), 3);
        assert_eq!(
            consideration.by().as_str(),
            "C3fn3liRBFC1iPRj6ORXkl5lY77+HliVcATSavbVi3w="
        );
    }

    #[tokio::test]
    async fn test_sign_with_wrong_passphrase() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = ctx_with_mind(&temp);

        assert!(matches!(
            sign(None, "wrong horse").execute(&ctx).await,
            Err(SignError::Consideration(ConsiderationError::Derivation(_)))
        ));
        assert!(matches!(
            sign(Some(7), "correct horse").execute(&ctx).await,
            Err(SignError::Key(KeyError::InvalidInput(_)))
        ));
    }
}
