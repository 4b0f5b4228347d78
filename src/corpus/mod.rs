// src/corpus/mod.rs
// =============================================================================
// This module turns the on-disk rule corpus into a Reference Set: a mapping
// from every URL found in a rule.html to the files that reference it.
//
// Submodules:
// - html:     pulls <a href> values out of one HTML document
// - metadata: decides whether a rule-language pair is active
// - scan:     walks rules_dir/<rule-id>/<language>/rule.html
// =============================================================================

mod html;
mod metadata;
mod scan;

pub use html::extract_links;
pub use metadata::is_active;
pub use scan::{collect_links, ReferenceSet};
