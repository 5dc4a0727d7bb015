//! Concurrent page-content fetcher.
//!
//! Given an ordered list of URLs, issues one GET per URL concurrently,
//! extracts a bounded snippet of paragraph text from each page, and returns
//! one outcome per URL in input order. A failed fetch never aborts the
//! batch; every failure path settles into a [`FetchOutcome::Failure`] value.

use std::sync::Arc;
use std::time::Duration;

use scraper::{Html, Selector};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Per-request deadline covering connect, headers, and body read.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// At most this many `<p>` elements, in document order, contribute to a snippet.
const MAX_PARAGRAPHS: usize = 5;

/// Hard character cap on an extracted snippet (not word-aware).
const MAX_SNIPPET_CHARS: usize = 1500;

/// Why a single URL failed to yield a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Transport(String),

    #[error("empty URL")]
    EmptyUrl,
}

/// The settled result for one URL in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Paragraph text extracted from a 200 response.
    Snippet(String),
    /// The URL did not yield a snippet; `reason` says why.
    Failure { url: String, reason: FetchFailure },
}

impl FetchOutcome {
    pub fn is_snippet(&self) -> bool {
        matches!(self, FetchOutcome::Snippet(_))
    }

    /// Render this outcome as one block of the downstream "market context"
    /// text. Failure lines name the URL so the aggregated context stays
    /// readable when some pages were unreachable.
    pub fn context_line(&self) -> String {
        match self {
            FetchOutcome::Snippet(text) => text.clone(),
            FetchOutcome::Failure { url, reason } => match reason {
                FetchFailure::Status(code) => {
                    format!("لم يتمكن من الوصول إلى {url} - حالة HTTP: {code}")
                }
                FetchFailure::Timeout => format!("انتهت مهلة الاتصال بالموقع: {url}"),
                FetchFailure::Transport(detail) => {
                    format!("خطأ أثناء جلب المحتوى من {url}: {detail}")
                }
                FetchFailure::EmptyUrl => "رابط فارغ في نتائج البحث".to_string(),
            },
        }
    }
}

/// Join per-URL outcomes into the aggregated context text handed to the
/// prompt, one blank line between blocks.
pub fn context_text(outcomes: &[FetchOutcome]) -> String {
    outcomes
        .iter()
        .map(FetchOutcome::context_line)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fetches page text for batches of URLs.
///
/// Each batch is a pure fan-out: one GET per URL, no retries, no shared
/// state between sibling fetches. Outcomes come back index-aligned with the
/// input regardless of completion order.
pub struct ContentFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_in_flight: Option<usize>,
}

impl ContentFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
            max_in_flight: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cap the number of concurrent requests per batch. Unlimited when unset.
    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = Some(limit.max(1));
        self
    }

    /// Fetch one URL. Never returns an error: every failure path settles
    /// into a `Failure` outcome so one bad URL cannot abort a batch.
    pub async fn fetch_one(&self, url: &str) -> FetchOutcome {
        if url.trim().is_empty() {
            return FetchOutcome::Failure {
                url: url.to_string(),
                reason: FetchFailure::EmptyUrl,
            };
        }

        if let Err(e) = url::Url::parse(url) {
            return FetchOutcome::Failure {
                url: url.to_string(),
                reason: FetchFailure::Transport(format!("invalid URL: {e}")),
            };
        }

        match tokio::time::timeout(self.timeout, self.get_text(url)).await {
            Ok(Ok(body)) => {
                let snippet = extract_snippet(&body);
                debug!(url, chars = snippet.chars().count(), "Fetched snippet");
                FetchOutcome::Snippet(snippet)
            }
            Ok(Err(reason)) => {
                warn!(url, %reason, "Fetch failed");
                FetchOutcome::Failure {
                    url: url.to_string(),
                    reason,
                }
            }
            Err(_) => {
                warn!(url, timeout_secs = self.timeout.as_secs_f64(), "Fetch timed out");
                FetchOutcome::Failure {
                    url: url.to_string(),
                    reason: FetchFailure::Timeout,
                }
            }
        }
    }

    /// Fetch every URL concurrently and return outcomes in input order.
    ///
    /// Wall-clock time for the batch is bounded by the slowest single fetch
    /// (itself capped by the per-request deadline), not the sum of all
    /// fetches. The call resolves only once every URL has settled.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<FetchOutcome> {
        let semaphore = self
            .max_in_flight
            .map(|limit| Arc::new(Semaphore::new(limit)));

        let fetches = urls.iter().map(|url| {
            let semaphore = semaphore.clone();
            async move {
                // The semaphore lives for the whole batch, so acquire only
                // fails if it were closed, which never happens here.
                let _permit = match &semaphore {
                    Some(s) => s.acquire().await.ok(),
                    None => None,
                };
                self.fetch_one(url).await
            }
        });

        futures::future::join_all(fetches).await
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchFailure> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        resp.text()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))
    }
}

impl Default for ContentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the text of the first `MAX_PARAGRAPHS` `<p>` elements, in document
/// order, joined by newlines and cut at `MAX_SNIPPET_CHARS` characters.
fn extract_snippet(html: &str) -> String {
    let document = Html::parse_document(html);
    let paragraph = Selector::parse("p").expect("valid selector");

    let paragraphs: Vec<String> = document
        .select(&paragraph)
        .take(MAX_PARAGRAPHS)
        .map(|p| p.text().collect::<String>())
        .collect();

    truncate_chars(&paragraphs.join("\n"), MAX_SNIPPET_CHARS)
}

/// Hard cut at `max` characters, safe on multi-byte text.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
