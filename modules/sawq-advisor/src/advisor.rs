//! Orchestration pipeline: search → fetch → prompt → generate.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use sawq_common::SawqError;
use search_client::{GoogleSearchClient, SearchHit};

use crate::fetcher::{context_text, ContentFetcher};
use crate::prompt;

// --- Seams for the two hosted services ---

#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>>;
}

#[async_trait]
impl WebSearcher for GoogleSearchClient {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>> {
        Ok(GoogleSearchClient::search(self, query, num_results).await?)
    }
}

#[async_trait]
pub trait CopyGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl CopyGenerator for ai_client::Claude {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(self.complete(prompt).await?)
    }
}

// --- Pipeline ---

/// A page the brief was grounded on, for display alongside the copy.
#[derive(Debug, Clone)]
pub struct Source {
    pub title: String,
    pub link: String,
}

/// The finished output: generated Arabic copy plus the pages it drew from.
#[derive(Debug, Clone)]
pub struct MarketingBrief {
    pub copy: String,
    pub sources: Vec<Source>,
}

pub struct Advisor<S, G> {
    searcher: S,
    generator: G,
    fetcher: ContentFetcher,
}

impl<S: WebSearcher, G: CopyGenerator> Advisor<S, G> {
    pub fn new(searcher: S, generator: G, fetcher: ContentFetcher) -> Self {
        Self {
            searcher,
            generator,
            fetcher,
        }
    }

    /// Produce a marketing brief for a product described by `description`.
    ///
    /// The description doubles as the web-search query. Pages that fail to
    /// fetch contribute a failure line to the market context instead of
    /// aborting the run; the model still gets a best-effort context block.
    pub async fn advise(
        &self,
        description: &str,
        num_results: usize,
    ) -> Result<MarketingBrief, SawqError> {
        let hits = self
            .searcher
            .search(description, num_results)
            .await
            .map_err(|e| SawqError::Search(e.to_string()))?;

        info!(count = hits.len(), "Search complete");

        let urls: Vec<String> = hits.iter().map(|h| h.link.clone()).collect();
        let outcomes = self.fetcher.fetch_all(&urls).await;

        let fetched = outcomes.iter().filter(|o| o.is_snippet()).count();
        info!(total = outcomes.len(), fetched, "Page fetch complete");

        let market_context = context_text(&outcomes);
        let generation_prompt = prompt::build_marketing_prompt(&market_context);

        let raw = self
            .generator
            .generate(&generation_prompt)
            .await
            .map_err(|e| SawqError::Generation(e.to_string()))?;

        let copy = prompt::collapse_double_newlines(&raw);
        let sources = hits
            .into_iter()
            .map(|h| Source {
                title: h.title,
                link: h.link,
            })
            .collect();

        Ok(MarketingBrief { copy, sources })
    }
}
