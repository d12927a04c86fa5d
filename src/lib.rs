use chrono::{DateTime, Local};
use itertools::Itertools;
use std::fmt;
use tracing::{debug, error, info, warn};

pub mod config;
pub mod jobspy;
pub mod listing;
pub mod postgres;

mod data;
mod error;
mod utils;

pub use config::{PgSettings, ScrapePlan};
pub use data::Table;
pub use error::ScraperError;
pub use jobspy::{ScrapeRequest, Site};
pub use listing::{normalize, JobListing, JobRow, ResultSet};
pub use utils::{quote_identifier, table_slug};

/// The external capability that turns a search into job rows.
#[async_trait::async_trait]
pub trait JobScraper {
    async fn scrape(&self, request: &ScrapeRequest<'_>) -> Result<ResultSet, ScraperError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Written,
    /// A row with the same job_url already exists.
    Ignored,
}

#[async_trait::async_trait]
pub trait Storage {
    /// Create the category's table if needed and return its name.
    async fn ensure_table(&self, category: &str) -> Result<String, ScraperError>;
    async fn insert_row(&self, table: &str, row: &JobRow) -> Result<Insert, ScraperError>;
    async fn row_count(&self, table: &str) -> Result<i64, ScraperError>;
}

/// How a single (category, city) pair ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    Skipped,
    Done {
        found: usize,
        inserted: usize,
        ignored: usize,
        failed: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub pairs: usize,
    pub pairs_failed: usize,
    pub rows_seen: usize,
    pub rows_inserted: usize,
    pub rows_ignored: usize,
    pub rows_failed: usize,
}

impl RunReport {
    fn start() -> RunReport {
        RunReport {
            started_at: Local::now(),
            finished_at: None,
            pairs: 0,
            pairs_failed: 0,
            rows_seen: 0,
            rows_inserted: 0,
            rows_ignored: 0,
            rows_failed: 0,
        }
    }

    fn record(&mut self, outcome: PairOutcome) {
        self.pairs += 1;
        match outcome {
            PairOutcome::Skipped => self.pairs_failed += 1,
            PairOutcome::Done {
                found,
                inserted,
                ignored,
                failed,
            } => {
                self.rows_seen += found;
                self.rows_inserted += inserted;
                self.rows_ignored += ignored;
                self.rows_failed += failed;
            }
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pairs ({} failed), {} rows: {} inserted, {} duplicates, {} failed",
            self.pairs,
            self.pairs_failed,
            self.rows_seen,
            self.rows_inserted,
            self.rows_ignored,
            self.rows_failed
        )?;
        if let Some(finished_at) = self.finished_at {
            let elapsed = finished_at - self.started_at;
            write!(f, " in {}s", elapsed.num_seconds())?;
        }
        Ok(())
    }
}

/// Scrape every category and city in order, writing into one table per
/// category. Only a failure to prepare a table stops the run.
pub async fn run_scraper<C, S>(
    scraper: &C,
    storage: &S,
    plan: &ScrapePlan,
) -> Result<RunReport, ScraperError>
where
    C: JobScraper + Sync,
    S: Storage + Sync,
{
    let mut report = RunReport::start();
    info!(
        "Scraping {} categories x {} cities on {}",
        plan.categories.len(),
        plan.cities.len(),
        describe_sites(&plan.sites)
    );

    for category in &plan.categories {
        let table = storage.ensure_table(category).await?;
        debug!("Use table {}", table);

        for city in &plan.cities {
            let outcome = scrape_pair(scraper, storage, plan, category, city, &table).await;
            report.record(outcome);
        }

        match storage.row_count(&table).await {
            Ok(n) => debug!("Table {} holds {} jobs", table, n),
            Err(e) => warn!("Could not count rows of {}: {}", table, e),
        }
    }

    report.finished_at = Some(Local::now());
    info!("Run finished: {}", report);
    Ok(report)
}

fn describe_sites(sites: &[Site]) -> String {
    sites.iter().join(", ")
}

async fn scrape_pair<C, S>(
    scraper: &C,
    storage: &S,
    plan: &ScrapePlan,
    category: &str,
    city: &str,
    table: &str,
) -> PairOutcome
where
    C: JobScraper + Sync,
    S: Storage + Sync,
{
    info!("Scraping category='{}', city='{}'...", category, city);

    let result = match scraper.scrape(&plan.request(category, city)).await {
        Ok(result) => result,
        Err(e) => {
            error!(
                "Error scraping category='{}', city='{}': {}",
                category, city, e
            );
            return PairOutcome::Skipped;
        }
    };
    info!(
        "   Found {} jobs for category='{}', city='{}'.",
        result.len(),
        category,
        city
    );

    let (mut inserted, mut ignored, mut failed) = (0, 0, 0);
    for listing in normalize(&result) {
        match write_listing(storage, table, listing).await {
            Ok(Insert::Written) => inserted += 1,
            Ok(Insert::Ignored) => ignored += 1,
            Err(e) => {
                warn!("Error inserting job into table {}: {}", table, e);
                failed += 1;
            }
        }
    }

    PairOutcome::Done {
        found: result.len(),
        inserted,
        ignored,
        failed,
    }
}

async fn write_listing<S>(
    storage: &S,
    table: &str,
    listing: JobListing,
) -> Result<Insert, ScraperError>
where
    S: Storage + Sync,
{
    let row = JobRow::try_from(listing)?;
    storage.insert_row(table, &row).await
}
