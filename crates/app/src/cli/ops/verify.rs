use std::path::PathBuf;

use clap::Args;

use common::consideration::{Consideration, ConsiderationError};
use common::display::{shorten_b64, shorten_hex};

use super::read_input;

#[derive(Args, Debug, Clone)]
pub struct Verify {
    /// Consideration JSON file (reads stdin if absent or `-`)
    pub file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("failed to read consideration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode consideration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid consideration: {0}")]
    Invalid(#[from] ConsiderationError),
}

/// Check a consideration, describing it if the signature holds
pub fn describe(consideration: &Consideration) -> Result<String, ConsiderationError> {
    consideration.verify()?;
    let id = consideration.id()?;
    Ok(format!(
        "valid {} by {} for {} (series {})",
        shorten_hex(&id.to_hex()),
        shorten_b64(consideration.by().as_str()),
        shorten_b64(consideration.for_().as_str()),
        consideration.series()
    ))
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Verify {
    type Error = VerifyError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let input = read_input(self.file.as_deref()).await?;
        let consideration: Consideration = serde_json::from_str(&input)?;
        Ok(describe(&consideration)?)
    }
}
