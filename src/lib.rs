// src/lib.rs
// =============================================================================
// Library root for link-vigil.
//
// The binary (src/main.rs) is a thin wrapper over this crate so that
// integration tests can run the whole check pipeline in-process.
//
// Modules:
// - cli:     command-line definitions (clap)
// - corpus:  walks the rule directories and extracts links from rule.html
// - checker: probing policy, probe history, confirmation and reporting
// =============================================================================

pub mod checker;
pub mod cli;
pub mod corpus;
