// src/corpus/scan.rs
// =============================================================================
// This module walks the rule corpus and builds the Reference Set.
//
// Expected layout:
//   rules_dir/<rule-id>/metadata.json            (generic, optional)
//   rules_dir/<rule-id>/<language>/metadata.json (override, optional)
//   rules_dir/<rule-id>/<language>/rule.html
//
// Only the root directory being unreadable is fatal; everything below it is
// skipped with a warning when it cannot be read.
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;

use super::html;
use super::metadata;

/// URL -> ordered list of absolute file paths referencing it.
///
/// An IndexMap keeps first-discovery order, which is also the order URLs are
/// probed in later.
pub type ReferenceSet = IndexMap<String, Vec<PathBuf>>;

/// Builds the Reference Set for a corpus root.
///
/// Links of a rule-language pair are included only when the pair is active
/// according to its metadata (see `metadata::is_active`).
pub fn collect_links(rules_dir: &Path) -> Result<ReferenceSet> {
    println!("Finding links in html files");

    let mut urls = ReferenceSet::new();

    for rulepath in subdirectories(rules_dir)
        .with_context(|| format!("cannot read rules directory {}", rules_dir.display()))?
    {
        let generic_metadata = rulepath.join("metadata.json");

        let langpaths = match subdirectories(&rulepath) {
            Ok(paths) => paths,
            Err(e) => {
                eprintln!("Warning: skipping {}: {}", rulepath.display(), e);
                continue;
            }
        };

        for langpath in langpaths {
            let metadata = langpath.join("metadata.json");
            let filepath = langpath.join("rule.html");
            if filepath.exists() && metadata::is_active(&metadata, &generic_metadata) {
                collect_file_links(&filepath, &mut urls);
            }
        }
    }

    println!("All html files crawled");
    Ok(urls)
}

/// Lists the subdirectories of `dir` in sorted name order. Plain files
/// (like the sibling metadata.json) are expected and skipped silently.
fn subdirectories(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    paths.sort();
    Ok(paths)
}

/// Appends every link in one rule.html to the Reference Set, keyed by the
/// verbatim href and carrying the absolute path of the referencing file.
fn collect_file_links(filepath: &Path, urls: &mut ReferenceSet) {
    let contents = match fs::read_to_string(filepath) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Warning: skipping unreadable {}: {}", filepath.display(), e);
            return;
        }
    };

    let filename = std::path::absolute(filepath).unwrap_or_else(|_| filepath.to_path_buf());
    for href in html::extract_links(&contents) {
        urls.entry(href).or_default().push(filename.clone());
    }
}
