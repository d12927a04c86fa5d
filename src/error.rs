#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::error::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Scraper responded with status {status}: {body}")]
    ScraperStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid {column} value {value:?}")]
    InvalidAmount { column: &'static str, value: String },

    #[error("Category {0:?} does not map to a table name")]
    InvalidCategory(String),

    #[error("Missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("Invalid environment variable {name}={value:?}")]
    InvalidEnv { name: &'static str, value: String },
}
