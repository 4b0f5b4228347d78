// tests/check_links.rs
// =============================================================================
// End-to-end scenarios: a corpus built in a temporary directory, probed
// against a loopback HTTP listener whose status code the test controls.
// =============================================================================

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use link_vigil::checker::{self, ProbeHistory};

// Answers every connection with whatever status code is currently stored in
// the shared cell, so a "dead" URL can come back to life mid-test.
async fn spawn_switchable_server(status: Arc<AtomicU16>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let code = status.load(Ordering::SeqCst);
            let reason = match code {
                200 => "OK",
                404 => "Not Found",
                _ => "Status",
            };
            let response = format!(
                "HTTP/1.1 {} {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                code, reason
            );
            let _ = stream.write_all(response.as_bytes()).await;
        }
    });
    addr
}

// Answers the first request with `first` and every later one with `rest`.
async fn spawn_sequence_server(first: u16, rest: u16) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = Arc::new(AtomicUsize::new(0));
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let code = if served.fetch_add(1, Ordering::SeqCst) == 0 {
                first
            } else {
                rest
            };
            let response = format!(
                "HTTP/1.1 {} X\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                code
            );
            let _ = stream.write_all(response.as_bytes()).await;
        }
    });
    addr
}

fn add_rule_page(root: &Path, rule: &str, lang: &str, html: &str) {
    let dir = root.join(rule).join(lang);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("rule.html"), html).unwrap();
}

#[tokio::test]
async fn test_dead_link_fails_the_run_and_recovers() {
    let status = Arc::new(AtomicU16::new(404));
    let addr = spawn_switchable_server(status.clone()).await;
    let dead_url = format!("http://{}/x", addr);

    let corpus = TempDir::new().unwrap();
    add_rule_page(
        corpus.path(),
        "S100",
        "java",
        &format!(
            r##"<a href="{}">external</a>
                <a href="#section">local</a>
                <a href="https://wiki.sei.cmu.edu/confluence/x">excepted</a>"##,
            dead_url
        ),
    );
    add_rule_page(corpus.path(), "S200", "python", "<p>no links here</p>");
    let history_file = corpus.path().join("history.json");

    let success = checker::check_links(corpus.path(), &history_file, false)
        .await
        .unwrap();
    assert!(!success);

    // Only the genuinely probed-and-dead URL is special: the anchor and the
    // exception never entered the history, and neither did the dead link.
    let history = ProbeHistory::load(&history_file);
    assert!(history.is_empty());

    // The server comes back; the same corpus now passes and the recovered
    // URL is recorded as alive.
    status.store(200, Ordering::SeqCst);
    let success = checker::check_links(corpus.path(), &history_file, false)
        .await
        .unwrap();
    assert!(success);

    let history = ProbeHistory::load(&history_file);
    assert!(history.last_reached(&dead_url).is_some());
    assert!(history.last_reached("#section").is_none());
    assert!(history
        .last_reached("https://wiki.sei.cmu.edu/confluence/x")
        .is_none());
}

#[tokio::test]
async fn test_empty_corpus_passes() {
    let corpus = TempDir::new().unwrap();
    let history_file = corpus.path().join("history.json");

    let success = checker::check_links(corpus.path(), &history_file, false)
        .await
        .unwrap();
    assert!(success);
    // History is still persisted at the end of the run.
    assert!(history_file.exists());
}

#[tokio::test]
async fn test_deprecated_rule_language_is_never_probed() {
    // The link is dead, but its only referencing page is deprecated, so it
    // must not even be extracted.
    let status = Arc::new(AtomicU16::new(404));
    let addr = spawn_switchable_server(status).await;

    let corpus = TempDir::new().unwrap();
    add_rule_page(
        corpus.path(),
        "S300",
        "java",
        &format!(r#"<a href="http://{}/gone">dead</a>"#, addr),
    );
    fs::write(
        corpus.path().join("S300/java/metadata.json"),
        r#"{"status": "deprecated"}"#,
    )
    .unwrap();
    let history_file = corpus.path().join("history.json");

    let success = checker::check_links(corpus.path(), &history_file, false)
        .await
        .unwrap();
    assert!(success);
}

#[tokio::test]
async fn test_confirmation_recovers_transient_failure() {
    // First probe sees a 404, the confirmation retry sees a 200: the run
    // passes and the URL is rejuvenated.
    let addr = spawn_sequence_server(404, 200).await;
    let url = format!("http://{}/flaky", addr);

    let corpus = TempDir::new().unwrap();
    add_rule_page(
        corpus.path(),
        "S400",
        "cfamily",
        &format!(r#"<a href="{}">flaky</a>"#, url),
    );
    let history_file = corpus.path().join("history.json");

    let success = checker::check_links(corpus.path(), &history_file, false)
        .await
        .unwrap();
    assert!(success);

    let history = ProbeHistory::load(&history_file);
    assert!(history.last_reached(&url).is_some());
}

#[tokio::test]
async fn test_recent_history_tolerates_downtime() {
    let status = Arc::new(AtomicU16::new(404));
    let addr = spawn_switchable_server(status).await;
    let url = format!("http://{}/down", addr);

    let corpus = TempDir::new().unwrap();
    add_rule_page(
        corpus.path(),
        "S500",
        "python",
        &format!(r#"<a href="{}">down</a>"#, url),
    );
    let history_file = corpus.path().join("history.json");

    // Confirmed alive three days ago: today's failure is a tolerated blip.
    let mut seeded = ProbeHistory::default();
    seeded.rejuvenate_at(&url, Utc::now() - Duration::days(3));
    seeded.save(&history_file).unwrap();

    let success = checker::check_links(corpus.path(), &history_file, false)
        .await
        .unwrap();
    assert!(success);

    // Eight days push it past the tolerable window: now it is an error.
    let mut seeded = ProbeHistory::default();
    seeded.rejuvenate_at(&url, Utc::now() - Duration::days(8));
    seeded.save(&history_file).unwrap();

    let success = checker::check_links(corpus.path(), &history_file, false)
        .await
        .unwrap();
    assert!(!success);
}

#[tokio::test]
async fn test_json_mode_reports_dead_links() {
    let status = Arc::new(AtomicU16::new(404));
    let addr = spawn_switchable_server(status).await;
    let url = format!("http://{}/x", addr);

    let corpus = TempDir::new().unwrap();
    add_rule_page(
        corpus.path(),
        "S600",
        "java",
        &format!(r#"<a href="{}">dead</a>"#, url),
    );
    let history_file = corpus.path().join("history.json");

    let success = checker::check_links(corpus.path(), &history_file, true)
        .await
        .unwrap();
    assert!(!success);
}
