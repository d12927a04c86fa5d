use crate::ScraperError;
use serde_json::{Map, Value};

/// Canonical column order of every destination table.
pub const COLUMNS: [&str; 11] = [
    "SITE",
    "TITLE",
    "COMPANY",
    "CITY",
    "STATE",
    "JOB_TYPE",
    "INTERVAL",
    "MIN_AMOUNT",
    "MAX_AMOUNT",
    "JOB_URL",
    "DESCRIPTION",
];

pub type RawRecord = Map<String, Value>;

/// Tabular output of a scrape. Rows may disagree on column names and casing
/// depending on which job board produced them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<RawRecord>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<RawRecord>> for ResultSet {
    fn from(rows: Vec<RawRecord>) -> Self {
        ResultSet { rows }
    }
}

/// A scraped job reshaped to the fixed column contract. Missing cells hold an
/// empty string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JobListing {
    pub site: String,
    pub title: String,
    pub company: String,
    pub city: String,
    pub state: String,
    pub job_type: String,
    pub interval: String,
    pub min_amount: String,
    pub max_amount: String,
    pub job_url: String,
    pub description: String,
}

impl JobListing {
    pub fn columns(&self) -> [(&'static str, &str); 11] {
        [
            (COLUMNS[0], self.site.as_str()),
            (COLUMNS[1], self.title.as_str()),
            (COLUMNS[2], self.company.as_str()),
            (COLUMNS[3], self.city.as_str()),
            (COLUMNS[4], self.state.as_str()),
            (COLUMNS[5], self.job_type.as_str()),
            (COLUMNS[6], self.interval.as_str()),
            (COLUMNS[7], self.min_amount.as_str()),
            (COLUMNS[8], self.max_amount.as_str()),
            (COLUMNS[9], self.job_url.as_str()),
            (COLUMNS[10], self.description.as_str()),
        ]
    }

    fn from_record(record: &RawRecord) -> JobListing {
        // Upper-case every key; the first column wins when two keys collide.
        let mut upper: Vec<(String, &Value)> = Vec::with_capacity(record.len());
        for (key, value) in record {
            let key = key.to_uppercase();
            if !upper.iter().any(|(k, _)| *k == key) {
                upper.push((key, value));
            }
        }

        let cell = |column: &str| {
            upper
                .iter()
                .find(|(k, _)| k == column)
                .map(|(_, v)| cell_text(v))
                .unwrap_or_default()
        };

        let [site, title, company, city, state, job_type, interval, min_amount, max_amount, job_url, description] =
            COLUMNS.map(cell);
        JobListing {
            site,
            title,
            company,
            city,
            state,
            job_type,
            interval,
            min_amount,
            max_amount,
            job_url,
            description,
        }
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Reshape every raw record to the canonical columns.
pub fn normalize(result: &ResultSet) -> Vec<JobListing> {
    result.rows.iter().map(JobListing::from_record).collect()
}

/// The empty placeholder becomes NULL; anything else must be a number.
pub fn parse_amount(column: &'static str, cell: &str) -> Result<Option<f32>, ScraperError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f32>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(ScraperError::InvalidAmount {
            column,
            value: cell.to_string(),
        }),
    }
}

/// A listing ready to be bound to an insert statement.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRow {
    pub site: String,
    pub title: String,
    pub company: String,
    pub city: String,
    pub state: String,
    pub job_type: String,
    pub interval: String,
    pub min_amount: Option<f32>,
    pub max_amount: Option<f32>,
    pub job_url: String,
    pub description: String,
}

impl TryFrom<JobListing> for JobRow {
    type Error = ScraperError;

    fn try_from(listing: JobListing) -> Result<Self, Self::Error> {
        let min_amount = parse_amount(COLUMNS[7], &listing.min_amount)?;
        let max_amount = parse_amount(COLUMNS[8], &listing.max_amount)?;
        Ok(JobRow {
            site: listing.site,
            title: listing.title,
            company: listing.company,
            city: listing.city,
            state: listing.state,
            job_type: listing.job_type,
            interval: listing.interval,
            min_amount,
            max_amount,
            job_url: listing.job_url,
            description: listing.description,
        })
    }
}
