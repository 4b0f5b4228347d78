// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Dispatch to the subcommand handler
// 3. Exit with proper code (0 = all links alive, 1 = dead links, 2 = error)
// =============================================================================

use anyhow::Result;
use clap::Parser;

use link_vigil::checker;
use link_vigil::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Fatal errors only: unreadable corpus root, HTTP client setup.
            // Anything link-related is handled inside the checker.
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            rules_dir,
            history_file,
            json,
        } => {
            let success = checker::check_links(&rules_dir, &history_file, json).await?;
            Ok(if success { 0 } else { 1 })
        }
    }
}
