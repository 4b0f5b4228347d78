// src/corpus/metadata.rs
// =============================================================================
// This module decides whether a rule-language pair takes part in link
// checking, based on the `status` field of its metadata.json files.
//
// Precedence: the language-specific file is read first and its `status`
// field, when present, decides alone. The generic per-rule file is only
// consulted when the language-specific file parses but carries no `status`
// field. A file that is missing, unreadable, or malformed fails open: the
// pair counts as active.
// =============================================================================

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// The only metadata field consulted; everything else in the file is ignored.
#[derive(Debug, Deserialize)]
struct Metadata {
    status: Option<String>,
}

/// Reads the `status` field of a metadata.json, or None when the file is
/// missing, unreadable, malformed, or has no `status` field.
fn read_status(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let metadata: Metadata = serde_json::from_str(&text).ok()?;
    metadata.status
}

/// Returns whether the rule-language pair behind these metadata files is
/// active. Only an explicit `status` other than `"ready"` deactivates it.
pub fn is_active(metadata_path: &Path, generic_metadata_path: &Path) -> bool {
    // Language-specific status always wins when present.
    let text = match fs::read_to_string(metadata_path) {
        Ok(text) => text,
        Err(_) => return true,
    };
    let metadata: Metadata = match serde_json::from_str(&text) {
        Ok(metadata) => metadata,
        Err(_) => return true,
    };
    if let Some(status) = metadata.status {
        return status == "ready";
    }

    // No status field in the language file: fall back to the generic one.
    match read_status(generic_metadata_path) {
        Some(status) => status == "ready",
        None => true,
    }
}
