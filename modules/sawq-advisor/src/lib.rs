pub mod advisor;
pub mod fetcher;
pub mod prompt;

pub use advisor::{Advisor, CopyGenerator, MarketingBrief, Source, WebSearcher};
pub use fetcher::{context_text, ContentFetcher, FetchFailure, FetchOutcome};
