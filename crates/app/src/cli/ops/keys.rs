use clap::Args;

use crate::state::StateError;

use super::format_keys;

#[derive(Args, Debug, Clone)]
pub struct Keys;

#[async_trait::async_trait]
impl crate::cli::op::Op for Keys {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let session = ctx.state()?.session()?;
        if !session.has_mind() {
            return Ok("No mind imported".to_string());
        }
        Ok(format_keys(session.public_keys(), session.selected_index()))
    }
}
