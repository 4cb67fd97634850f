pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mind")]
#[command(about = "Derive minds, sign considerations and inspect the graph around them")]
pub struct Args {
    /// Path to the mind config directory (defaults to ~/.mind)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Default log directive (overridden by RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
