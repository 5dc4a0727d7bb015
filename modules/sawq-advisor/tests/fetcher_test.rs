//! Batch-level tests for the concurrent content fetcher against local HTTP
//! endpoints: ordering, failure isolation, deadlines, and snippet bounds.
//!
//! Run with: cargo test -p sawq-advisor --test fetcher_test

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use sawq_advisor::{ContentFetcher, FetchFailure, FetchOutcome};

// ---------------------------------------------------------------------------
// Local test server
// ---------------------------------------------------------------------------

async fn delayed_page(Path((ms, id)): Path<(u64, String)>) -> Html<String> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Html(format!("<html><body><p>page {id}</p></body></html>"))
}

fn long_paragraph(i: usize) -> String {
    char::from(b'a' + i as u8).to_string().repeat(400)
}

async fn long_page() -> Html<String> {
    let body: String = (0..7)
        .map(|i| format!("<p>{}</p>", long_paragraph(i)))
        .collect();
    Html(format!("<html><body>{body}</body></html>"))
}

async fn serve() -> SocketAddr {
    let app = Router::new()
        .route("/delay/{ms}/{id}", get(delayed_page))
        .route("/long", get(long_page))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn snippet_text(outcome: &FetchOutcome) -> &str {
    match outcome {
        FetchOutcome::Snippet(text) => text,
        other => panic!("expected snippet, got {other:?}"),
    }
}

fn failure_reason(outcome: &FetchOutcome) -> &FetchFailure {
    match outcome {
        FetchOutcome::Failure { reason, .. } => reason,
        other => panic!("expected failure, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Ordering and isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn output_order_matches_input_order_despite_completion_order() {
    let addr = serve().await;

    // Latencies chosen so completion order is roughly the reverse of input
    // order; output alignment must not depend on it.
    let delays = [190u64, 10, 120, 40, 160, 70];
    let urls: Vec<String> = delays
        .iter()
        .enumerate()
        .map(|(i, ms)| format!("http://{addr}/delay/{ms}/p{i}"))
        .collect();

    let outcomes = ContentFetcher::new().fetch_all(&urls).await;

    assert_eq!(outcomes.len(), urls.len());
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(snippet_text(outcome), &format!("page p{i}"));
    }
}

#[tokio::test]
async fn one_failing_url_does_not_affect_its_siblings() {
    let addr = serve().await;

    let urls = vec![
        format!("http://{addr}/delay/0/ok"),
        format!("http://{addr}/missing"),
        // Nothing listens on port 1: transport-level failure.
        "http://127.0.0.1:1/".to_string(),
    ];

    let outcomes = ContentFetcher::new().fetch_all(&urls).await;

    assert_eq!(snippet_text(&outcomes[0]), "page ok");
    assert_eq!(failure_reason(&outcomes[1]), &FetchFailure::Status(404));
    assert!(matches!(
        failure_reason(&outcomes[2]),
        FetchFailure::Transport(_)
    ));
}

#[tokio::test]
async fn empty_input_yields_empty_output() {
    let outcomes = ContentFetcher::new().fetch_all(&[]).await;
    assert!(outcomes.is_empty());
}

#[tokio::test]
async fn blank_entries_settle_as_failures_at_their_own_index() {
    let addr = serve().await;

    let urls = vec![
        String::new(),
        format!("http://{addr}/delay/0/one"),
        "   ".to_string(),
        format!("http://{addr}/delay/0/two"),
    ];

    let outcomes = ContentFetcher::new().fetch_all(&urls).await;

    assert_eq!(outcomes.len(), 4);
    assert_eq!(failure_reason(&outcomes[0]), &FetchFailure::EmptyUrl);
    assert_eq!(snippet_text(&outcomes[1]), "page one");
    assert_eq!(failure_reason(&outcomes[2]), &FetchFailure::EmptyUrl);
    assert_eq!(snippet_text(&outcomes[3]), "page two");
}

// ---------------------------------------------------------------------------
// Deadlines
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slow_endpoint_settles_as_timeout_not_generic_failure() {
    let addr = serve().await;

    let fetcher = ContentFetcher::new().with_timeout(Duration::from_millis(300));
    let urls = vec![
        format!("http://{addr}/delay/5000/slow-a"),
        format!("http://{addr}/delay/5000/slow-b"),
        format!("http://{addr}/delay/10/fast"),
    ];

    let started = Instant::now();
    let outcomes = fetcher.fetch_all(&urls).await;
    let elapsed = started.elapsed();

    // The batch resolves around the deadline, not around the 5s sleeps.
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    assert_eq!(failure_reason(&outcomes[0]), &FetchFailure::Timeout);
    assert_eq!(failure_reason(&outcomes[1]), &FetchFailure::Timeout);
    assert_eq!(snippet_text(&outcomes[2]), "page fast");
}

#[tokio::test]
async fn batch_wall_clock_is_bounded_by_slowest_fetch_not_the_sum() {
    let addr = serve().await;

    let urls: Vec<String> = (0..5)
        .map(|i| format!("http://{addr}/delay/400/p{i}"))
        .collect();

    let started = Instant::now();
    let outcomes = ContentFetcher::new().fetch_all(&urls).await;
    let elapsed = started.elapsed();

    assert!(outcomes.iter().all(FetchOutcome::is_snippet));
    // Sequential fetching would take at least 2s.
    assert!(elapsed < Duration::from_millis(1500), "took {elapsed:?}");
}

#[tokio::test]
async fn in_flight_cap_serializes_requests() {
    let addr = serve().await;

    let fetcher = ContentFetcher::new().with_max_in_flight(1);
    let urls = vec![
        format!("http://{addr}/delay/200/first"),
        format!("http://{addr}/delay/200/second"),
    ];

    let started = Instant::now();
    let outcomes = fetcher.fetch_all(&urls).await;
    let elapsed = started.elapsed();

    assert!(outcomes.iter().all(FetchOutcome::is_snippet));
    assert!(elapsed >= Duration::from_millis(400), "took {elapsed:?}");
}

// ---------------------------------------------------------------------------
// Snippet bounds, end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn snippet_honors_paragraph_cap_and_character_cut() {
    let addr = serve().await;

    let urls = vec![format!("http://{addr}/long")];
    let outcomes = ContentFetcher::new().fetch_all(&urls).await;

    let snippet = snippet_text(&outcomes[0]);
    let first_five: String = (0..5)
        .map(long_paragraph)
        .collect::<Vec<_>>()
        .join("\n");

    // 5 paragraphs x 400 chars + 4 separators = 2004 chars before the cut.
    assert_eq!(snippet.chars().count(), 1500);
    assert!(first_five.starts_with(snippet));
    // Paragraphs past the cap never contribute.
    assert!(!snippet.contains('f'));
    assert!(!snippet.contains('g'));
}

#[tokio::test]
async fn invalid_url_settles_as_transport_failure() {
    let outcomes = ContentFetcher::new()
        .fetch_all(&["not a url".to_string()])
        .await;

    match failure_reason(&outcomes[0]) {
        FetchFailure::Transport(detail) => assert!(detail.contains("invalid URL")),
        other => panic!("expected transport failure, got {other:?}"),
    }
}
