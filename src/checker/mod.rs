// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - http:    single-URL liveness probe and outcome classification
// - history: url -> last-confirmed-alive store, persisted between runs
// - policy:  per-URL decision (exception / cache hit / probe / escalate)
// - report:  confirmation pass and the grouped error report
//
// check_links() below wires them into the full run.
// =============================================================================

mod history;
mod http;
mod policy;
mod report;

pub use history::ProbeHistory;
pub use http::{build_client, probe, ProbeOutcome, CONFIRMATION_TIMEOUT, PROBE_TIMEOUT};
pub use policy::{url_is_exception, CacheStats, EXCEPTION_PREFIXES};
pub use report::{confirm_errors, render_json, report_errors, DeadLink};

use std::path::Path;

use anyhow::Result;

use crate::corpus;

/// Runs the whole pipeline for one corpus: extract, probe under the caching
/// policy, confirm, report, persist history. Returns whether every link
/// resolved as alive.
///
/// The history file is written back even when dead links were found, so it
/// always reflects the latest successes.
pub async fn check_links(rules_dir: &Path, history_file: &Path, json: bool) -> Result<bool> {
    let mut history = ProbeHistory::load(history_file);
    let urls = corpus::collect_links(rules_dir)?;
    let client = build_client()?;

    let (presumed_errors, stats) = policy::scan(&client, &urls, &mut history).await;
    let confirmed_errors = confirm_errors(&client, presumed_errors, &urls, &mut history).await;

    println!("\n\n\n{}\n\n\n", "=".repeat(80));
    if !confirmed_errors.is_empty() {
        if json {
            println!("{}", render_json(&confirmed_errors, &urls)?);
        } else {
            report_errors(&confirmed_errors, &urls);
        }
        println!(
            "{}/{} links are dead, see above ^^ the list and the related files\n\n",
            confirmed_errors.len(),
            urls.len()
        );
    }
    stats.print();
    println!("\n\n\n{}\n\n\n", "=".repeat(80));

    let success = confirmed_errors.is_empty();
    if success {
        println!("All {} links are good", urls.len());
    }

    if let Err(e) = history.save(history_file) {
        eprintln!("Warning: failed to save url-probe history: {:#}", e);
    }

    Ok(success)
}
