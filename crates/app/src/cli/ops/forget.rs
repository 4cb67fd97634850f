use clap::Args;

use crate::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Forget;

#[async_trait::async_trait]
impl crate::cli::op::Op for Forget {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let mut session = state.session()?;
        if !session.has_mind() {
            return Ok("No mind imported".to_string());
        }

        session.forget_mind();
        state.store_session(&session)?;
        Ok("Forgot imported mind".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::op::{Op, OpContext};
    use crate::state::AppState;

    #[tokio::test]
    async fn test_forget_removes_keys() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("mind");
        let state = AppState::init(Some(path.clone()), None).unwrap();
        let ctx = OpContext::new(Some(path));

        let mut session = state.session().unwrap();
        session.import_mind("correct horse", 1).unwrap();
        state.store_session(&session).unwrap();

        assert_eq!(Forget.execute(&ctx).await.unwrap(), "Forgot imported mind");
        assert!(!state.keys_path.exists());
        assert_eq!(Forget.execute(&ctx).await.unwrap(), "No mind imported");
    }
}
