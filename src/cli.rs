// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is described with Rust structs
// and attributes, and clap generates the parsing code.
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "link-vigil",
    version = "0.1.0",
    about = "Verify that links referenced by generated rule descriptions are still alive",
    long_about = "link-vigil scans a tree of generated rule-description pages, probes every \
                  hyperlink they reference, and reports the ones that are persistently dead. \
                  Recently-verified links are skipped thanks to a probe history carried \
                  between runs, and presumed failures are retried with a longer timeout \
                  before they are reported."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every link referenced by the rule descriptions under a directory
    ///
    /// Example: link-vigil check ./rules --history-file probes.json
    Check {
        /// Root directory of the generated rule descriptions
        /// (layout: <rule-id>/<language>/rule.html)
        rules_dir: PathBuf,

        /// File where url-probe results are persisted between runs
        #[arg(long, default_value = "link_probes_history.json")]
        history_file: PathBuf,

        /// Output confirmed dead links as JSON instead of the grouped report
        #[arg(long)]
        json: bool,
    },
}
