use clap::Parser;
use jobs_scraper::{
    config,
    jobspy::{proxy, JobSpyApi, Site},
    postgres::PgStore,
    run_scraper, PgSettings, ScrapePlan,
};
use tracing::{info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

/// Scrape job boards for every category and city into per-category
/// PostgreSQL tables.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Only scrape these categories (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Only scrape these cities (repeatable)
    #[arg(long = "city")]
    cities: Vec<String>,

    /// Jobs requested per board for each category and city
    #[arg(long, default_value_t = config::RESULTS_WANTED)]
    results_wanted: u32,

    #[arg(long, default_value = config::COUNTRY)]
    country: String,

    /// Job boards to query (repeatable, defaults to all)
    #[arg(long = "site", value_enum)]
    sites: Vec<Site>,

    /// Test every proxy before scraping and keep only the working ones
    #[arg(long)]
    validate_proxies: bool,

    #[arg(long, env = "JOBSPY_API_URL", default_value = "http://localhost:8000")]
    jobspy_url: String,

    #[arg(long, env = "JOBSPY_API_KEY", hide_env_values = true)]
    jobspy_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL")
                .unwrap_or_else(|_| "info,sqlx=warn,hyper=warn,reqwest=info".into()),
        )
        .with(ErrorLayer::default())
        .init();

    let mut plan = ScrapePlan {
        country: args.country,
        results_wanted: args.results_wanted,
        ..ScrapePlan::default()
    }
    .only_categories(&args.categories)
    .only_cities(&args.cities);
    if !args.sites.is_empty() {
        plan.sites = args.sites;
    }

    if args.validate_proxies {
        plan.proxies = proxy::working_proxies(&plan.proxies).await;
        if plan.proxies.is_empty() {
            warn!("No working proxies, scraping without a proxy");
        }
    }

    let scraper = JobSpyApi::new(&args.jobspy_url, args.jobspy_api_key)?;
    let store = PgStore::connect(&PgSettings::from_env()?).await?;

    let result = run_scraper(&scraper, &store, &plan).await;
    store.close().await;
    let report = result?;

    info!(
        "All jobs have been scraped and saved to the PostgreSQL database! {}",
        report
    );
    Ok(())
}
