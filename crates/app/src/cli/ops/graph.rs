use std::path::PathBuf;

use clap::Args;

use common::session::Session;

use crate::state::StateError;

use super::read_input;

#[derive(Args, Debug, Clone)]
pub struct Graph {
    /// DOT file describing the neighbourhood (reads stdin if absent or `-`)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Public key to centre on (defaults to the selected key)
    #[arg(long)]
    pub focal: Option<String>,

    /// Minimum ranking percentage, clamped to 0..=100 (defaults to config)
    #[arg(long, allow_negative_numbers = true)]
    pub ranking_filter: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
    #[error("failed to read graph: {0}")]
    Io(#[from] std::io::Error),
    #[error("no focal key given and no mind imported")]
    NoFocal,
    #[error("failed to encode graph: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Graph {
    type Error = GraphError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut session = match ctx.state() {
            Ok(state) => state.session()?,
            Err(StateError::NotInitialized) => Session::default(),
            Err(e) => return Err(e.into()),
        };
        if let Some(percent) = self.ranking_filter {
            session.set_ranking_filter(percent);
        }

        let focal = match (&self.focal, session.selected_key()) {
            (Some(focal), _) => focal.clone(),
            (None, Some(key)) => key.to_string(),
            (None, None) => return Err(GraphError::NoFocal),
        };

        let text = read_input(self.file.as_deref()).await?;
        let graph = session.build_graph(&text, &focal);
        Ok(serde_json::to_string_pretty(&graph)?)
    }
}
