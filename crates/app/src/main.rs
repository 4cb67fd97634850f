mod cli;
mod logging;
mod state;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Forget, Graph, Import, Init, Keys, Select, Sign, Verify, Version};

command_enum! {
    (Forget, Forget),
    (Graph, Graph),
    (Import, Import),
    (Init, Init),
    (Keys, Keys),
    (Select, Select),
    (Sign, Sign),
    (Verify, Verify),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Log level: explicit flag > config log_level > info
    let log_level = args.log_level.clone().unwrap_or_else(|| {
        state::AppState::load(args.config_path.clone())
            .map(|state| state.config.log_level)
            .unwrap_or_else(|_| "info".to_string())
    });
    let guard = logging::init_logging(&log_level);

    let ctx = cli::op::OpContext::new(args.config_path);

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    // flush buffered log lines before exiting
    drop(guard);
    std::process::exit(code);
}
