// src/corpus/html.rs
// =============================================================================
// This module extracts link targets from HTML documents.
//
// We use the `scraper` crate which parses HTML into a DOM and supports CSS
// selectors (it's built on html5ever, Mozilla's HTML parser).
// =============================================================================

use scraper::{Html, Selector};

/// Returns the `href` of every `<a>` element in the document, in document
/// order. Anchors without an `href` attribute are ignored.
///
/// No normalization happens here: relative targets and same-page `#...`
/// anchors come back verbatim, exactly as written in the corpus.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // The selector is a constant and known to be valid, so unwrap is fine
    let selector = Selector::parse("a").unwrap();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
