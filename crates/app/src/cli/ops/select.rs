use clap::Args;

use common::crypto::KeyError;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Select {
    /// Index of the key to sign with
    pub index: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
    #[error("no mind imported. Run 'mind import' first")]
    NoMind,
    #[error("{0}")]
    Key(#[from] KeyError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Select {
    type Error = SelectError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let mut session = state.session()?;
        if !session.has_mind() {
            return Err(SelectError::NoMind);
        }

        session.select_key(self.index)?;
        state.store_session(&session)?;

        match session.selected_key() {
            Some(key) => Ok(format!("Selected key {}: {}", self.index, key)),
            None => Err(SelectError::NoMind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::op::{Op, OpContext};
    use crate::state::AppState;

    #[tokio::test]
    async fn test_select_persists() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("mind");
        let state = AppState::init(Some(path.clone()), None).unwrap();
        let ctx = OpContext::new(Some(path));

        assert!(matches!(
            Select { index: 0 }.execute(&ctx).await,
            Err(SelectError::NoMind)
        ));

        let mut session = state.session().unwrap();
        session.import_mind("correct horse", 3).unwrap();
        state.store_session(&session).unwrap();

        let output = Select { index: 1 }.execute(&ctx).await.unwrap();
        assert!(output.ends_with("BxlVtQhjHVYGsA9bYomX35SMgwSVLc77G4qJpbRR0dI="));
        assert_eq!(state.session().unwrap().selected_index(), Some(1));

        assert!(matches!(
            Select { index: 3 }.execute(&ctx).await,
            Err(SelectError::Key(KeyError::InvalidInput(_)))
        ));
    }
}
