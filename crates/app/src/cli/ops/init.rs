use clap::Args;

use crate::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Plots per series (default 1008)
    #[arg(long)]
    pub plots_until_new_series: Option<u64>,

    /// Number of keys derived on import (default 10)
    #[arg(long)]
    pub key_count: Option<usize>,

    /// Minimum ranking percentage for graph nodes (default 0)
    #[arg(long)]
    pub ranking_filter: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
    #[error("{0} must be positive")]
    NotPositive(&'static str),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig::default();
        if let Some(plots) = self.plots_until_new_series {
            if plots == 0 {
                return Err(InitError::NotPositive("plots until new series"));
            }
            config.plots_until_new_series = plots;
        }
        if let Some(count) = self.key_count {
            if count == 0 {
                return Err(InitError::NotPositive("key count"));
            }
            config.key_count = count;
        }
        if let Some(percent) = self.ranking_filter {
            config.ranking_filter = percent.clamp(0.0, 100.0);
        }

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        tracing::info!(path = %state.mind_dir.display(), "initialized mind directory");
        Ok(format!(
            "Initialized mind directory at {}",
            state.mind_dir.display()
        ))
    }
}
