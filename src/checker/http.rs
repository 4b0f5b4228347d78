// src/checker/http.rs
// =============================================================================
// This module performs the actual liveness probe for one URL.
//
// A probe is a single HEAD request with browser-like identification headers
// (naive bot filters reject obvious non-browser clients, which would show up
// as false dead links) and a bounded timeout. The outcome is classified into
// an explicit enum; the policy layer only cares about alive-or-not, the
// category is for the logs.
// =============================================================================

use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};

/// Timeout for the bulk first pass.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for the confirmation pass; generous so that slow-but-reachable
/// servers are not reported dead.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Classified result of probing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Same-page `#...` anchor, alive by definition, no request made
    Anchor,
    /// Resolved with a non-error status (1xx/2xx/3xx after redirects)
    Alive(u16),
    /// Resolved 4xx
    ClientError(u16),
    /// Resolved 5xx
    ServerError(u16),
    /// Request or socket timeout
    Timeout,
    /// TCP/TLS level connection failure
    ConnectionError,
    /// Redirect loop / over the redirect limit
    TooManyRedirects,
    /// The URL could not be turned into a request at all
    MalformedUrl,
    /// Anything the transport reports that fits none of the above
    Unexpected,
}

impl ProbeOutcome {
    /// Collapses the classification to the boolean the policy runs on.
    pub fn is_alive(&self) -> bool {
        matches!(self, ProbeOutcome::Anchor | ProbeOutcome::Alive(_))
    }
}

/// Builds the HTTP client shared by all probes in a run.
pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .default_headers(browser_headers())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

// Identification headers of a plain Chrome-on-Windows navigation. Hop-by-hop
// headers are left to the client itself.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(r#"" Not A;Brand";v="99", "Chromium";v="90""#),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?0"),
    );
    headers.insert(
        reqwest::header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36 GLS/100.10.9939.100",
        ),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
             image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
        ),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("none"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-user"),
        HeaderValue::from_static("?1"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers
}

/// Probes one URL with the given timeout.
///
/// Same-page anchors short-circuit without touching the network. Everything
/// else is a HEAD request; any resolved status below 400 counts as alive.
pub async fn probe(client: &Client, url: &str, timeout: Duration) -> ProbeOutcome {
    if url.starts_with('#') {
        return ProbeOutcome::Anchor;
    }

    match client.head(url).timeout(timeout).send().await {
        Ok(response) => classify_status(response.status()),
        Err(e) => classify_error(&e),
    }
}

fn classify_status(status: StatusCode) -> ProbeOutcome {
    let code = status.as_u16();
    if status.is_client_error() {
        println!("ERROR: {} Nothing there", code);
        ProbeOutcome::ClientError(code)
    } else if status.is_server_error() {
        println!("ERROR: {} Nothing there", code);
        ProbeOutcome::ServerError(code)
    } else {
        ProbeOutcome::Alive(code)
    }
}

// The timeout check comes first: reqwest wraps a timed-out connect attempt
// in a connect error as well.
fn classify_error(e: &reqwest::Error) -> ProbeOutcome {
    if e.is_timeout() {
        println!("ERROR: Request timeout {}", e);
        ProbeOutcome::Timeout
    } else if e.is_redirect() {
        println!("ERROR: Too many redirects: {}", e);
        ProbeOutcome::TooManyRedirects
    } else if e.is_connect() {
        println!("ERROR: Connection error {}", e);
        ProbeOutcome::ConnectionError
    } else if e.is_builder() {
        println!("ERROR: Bad URL: {}", e);
        ProbeOutcome::MalformedUrl
    } else {
        println!("ERROR: {}", e);
        ProbeOutcome::Unexpected
    }
}
