use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::Claude;
use sawq_advisor::{Advisor, ContentFetcher};
use sawq_common::{Config, SawqError};
use search_client::GoogleSearchClient;

/// Generate Arabic marketing copy for a product from live market context.
#[derive(Parser)]
#[command(name = "sawq-advisor")]
struct Args {
    /// Product name
    #[arg(long)]
    name: String,

    /// Product description (also used as the web-search query)
    #[arg(long)]
    description: String,

    /// Number of search results to fetch
    #[arg(long, default_value_t = 10)]
    results: usize,

    /// Cap on concurrent page fetches (unlimited when omitted)
    #[arg(long)]
    max_in_flight: Option<usize>,

    /// Per-page fetch deadline in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sawq_advisor=info".parse()?))
        .init();

    let args = Args::parse();

    if args.name.trim().is_empty() || args.description.trim().is_empty() {
        return Err(SawqError::InvalidInput(
            "الرجاء إدخال اسم المنتج ووصفه".to_string(),
        )
        .into());
    }

    let config = Config::from_env();
    config.log_redacted();

    info!(product = args.name.as_str(), "Sawq advisor starting");

    let searcher = GoogleSearchClient::new(&config.google_api_key, &config.google_cse_id);
    let generator = Claude::new(&config.anthropic_api_key, &config.claude_model);

    let mut fetcher = ContentFetcher::new().with_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(limit) = args.max_in_flight {
        fetcher = fetcher.with_max_in_flight(limit);
    }

    let advisor = Advisor::new(searcher, generator, fetcher);
    let brief = advisor.advise(&args.description, args.results).await?;

    println!("{}", brief.copy);

    println!("\nالمصادر المستخدمة:");
    for source in &brief.sources {
        let title = if source.title.is_empty() {
            "عنوان غير متاح"
        } else {
            source.title.as_str()
        };
        println!("- {title} ({})", source.link);
    }

    Ok(())
}
