pub mod error;

pub use error::{Result, SearchError};

use std::time::Duration;

use serde::Deserialize;
use tracing::info;

const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The Programmable Search API returns at most 10 results per request.
const MAX_RESULTS_PER_REQUEST: usize = 10;

/// One organic result from the search API.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchHit>,
}

/// Client for the Google Programmable Search JSON API.
pub struct GoogleSearchClient {
    client: reqwest::Client,
    api_key: String,
    cse_id: String,
    base_url: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: &str, cse_id: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.to_string(),
            cse_id: cse_id.to_string(),
            base_url: GOOGLE_SEARCH_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Run a web search and return organic results in ranking order.
    pub async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>> {
        let num = num_results.clamp(1, MAX_RESULTS_PER_REQUEST);

        info!(query, num, "Google search");

        let num = num.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: SearchResponse = resp.json().await?;

        info!(query, count = data.items.len(), "Google search complete");
        Ok(data.items)
    }
}
