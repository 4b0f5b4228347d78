// src/checker/report.rs
// =============================================================================
// This module owns the confirmation pass and the final error report.
//
// Presumed errors from the first pass are re-probed with the long timeout;
// whatever still fails is confirmed dead and rendered grouped by domain,
// and within a domain by the rule ids of the referencing files.
// =============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::corpus::ReferenceSet;

use super::history::ProbeHistory;
use super::http::{self, CONFIRMATION_TIMEOUT};

// Recognizes .../<rule-id>/<language>/rule.html reference paths.
static RULE_LANG_IN_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*[/\\](S\d{3,})[/\\]([^/\\]*)[/\\]rule\.html$").unwrap());

/// Re-probes each presumed error with the confirmation timeout.
///
/// A URL that answers this time is rejuvenated and dropped; the rest come
/// back as confirmed dead, in the order they were presumed.
pub async fn confirm_errors(
    client: &Client,
    presumed_errors: Vec<String>,
    urls: &ReferenceSet,
    history: &mut ProbeHistory,
) -> Vec<String> {
    let mut confirmed_errors = Vec::new();
    println!("Retrying {} failed probes", presumed_errors.len());
    for url in presumed_errors {
        let file_count = urls.get(&url).map_or(0, Vec::len);
        println!("{} in {} files (previously failed)", url, file_count);
        if http::probe(client, &url, CONFIRMATION_TIMEOUT).await.is_alive() {
            history.rejuvenate(&url);
        } else {
            confirmed_errors.push(url);
        }
    }
    confirmed_errors
}

/// One confirmed dead link, for the --json output mode.
#[derive(Debug, Serialize)]
pub struct DeadLink {
    pub url: String,
    pub domain: String,
    pub files: Vec<PathBuf>,
}

/// Renders the confirmed errors as pretty-printed JSON.
pub fn render_json(errors: &[String], urls: &ReferenceSet) -> serde_json::Result<String> {
    let mut sorted: Vec<&String> = errors.iter().collect();
    sorted.sort();
    let dead: Vec<DeadLink> = sorted
        .into_iter()
        .map(|url| DeadLink {
            url: url.clone(),
            domain: url_domain(url),
            files: urls.get(url).cloned().unwrap_or_default(),
        })
        .collect();
    serde_json::to_string_pretty(&dead)
}

/// Prints the grouped error report: dead URLs by domain, their referencing
/// files condensed to rule ids with the affected languages.
pub fn report_errors(errors: &[String], urls: &ReferenceSet) {
    println!("There were errors");

    let mut sorted: Vec<&String> = errors.iter().collect();
    sorted.sort();

    let mut by_domain: BTreeMap<String, Vec<&String>> = BTreeMap::new();
    for url in sorted {
        by_domain.entry(url_domain(url)).or_default().push(url);
    }

    for (domain, domain_urls) in &by_domain {
        println!("For domain = {}", domain);
        println!("{}", error_message_for_domain(domain_urls, urls));
        println!();
    }
}

// Network host (plus explicit port) of the URL; empty when it does not
// parse, so that malformed URLs still land in some group.
fn url_domain(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

fn error_message_for_domain(errors: &[&String], urls: &ReferenceSet) -> String {
    errors
        .iter()
        .map(|url| {
            let files = urls.get(*url).map(Vec::as_slice).unwrap_or(&[]);
            format!("| {} in:\n{}", url, report_files(files))
        })
        .collect::<Vec<String>>()
        .join("|\n")
}

// "|  S1234 (java, cfamily)" per rule id; files outside the recognized
// rule-path pattern are left out of the listing.
fn report_files(filenames: &[PathBuf]) -> String {
    let mut lang_by_rule: IndexMap<String, Vec<String>> = IndexMap::new();
    for file in filenames {
        let path = file.to_string_lossy();
        if let Some(captures) = RULE_LANG_IN_PATH.captures(&path) {
            lang_by_rule
                .entry(captures[1].to_string())
                .or_default()
                .push(captures[2].to_string());
        }
    }
    let mut res = String::new();
    for (rule, langs) in &lang_by_rule {
        res.push_str(&format!("|  {} ({})\n", rule, langs.join(", ")));
    }
    res
}
