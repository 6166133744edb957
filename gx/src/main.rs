// gx/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, DatasourceCommands, SuiteCommands};

#[tokio::main]
async fn main() {
    // 1. Setup Logging (Tracing)
    // stdout is the transcript, logs go to stderr. RUST_LOG=debug gx init ...
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { directory } => commands::init::execute(directory).await,
        Commands::Docs { directory, no_view } => commands::docs::execute(directory, no_view),
        Commands::Datasource {
            command: DatasourceCommands::List { directory },
        } => commands::datasource::list(directory),
        Commands::Suite {
            command: SuiteCommands::List { directory },
        } => commands::suite::list(directory),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("💥 Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
