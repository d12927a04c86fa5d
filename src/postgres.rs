use crate::{
    utils::{quote_identifier, table_slug},
    Insert, JobRow, PgSettings, ScraperError, Storage, Table,
};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};
use tracing::{debug, info};

/// Destination table of one job category.
pub struct CategoryTable {
    name: String,
    pool: PgPool,
}

#[async_trait::async_trait]
impl Table for CategoryTable {
    type Record<'a> = &'a JobRow;

    fn get_name(&self) -> &str {
        self.name.as_str()
    }

    fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    async fn create(&self) -> Result<(), sqlx::Error> {
        let query = format!(
            r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id SERIAL PRIMARY KEY,
                    site TEXT NOT NULL,
                    title TEXT,
                    company TEXT,
                    city TEXT,
                    state TEXT,
                    job_type TEXT,
                    "interval" TEXT,
                    min_amount REAL,
                    max_amount REAL,
                    job_url TEXT UNIQUE,
                    description TEXT
                )
            "#,
            quote_identifier(&self.name)
        );
        sqlx::query(query.as_str()).execute(self.get_pool()).await?;
        Ok(())
    }

    async fn insert<'a>(&self, row: Self::Record<'a>) -> Result<bool, sqlx::Error> {
        let query = format!(
            r#"INSERT INTO {} (
                site,
                title,
                company,
                city,
                state,
                job_type,
                "interval",
                min_amount,
                max_amount,
                job_url,
                description) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (job_url) DO NOTHING"#,
            quote_identifier(&self.name)
        );
        let result = sqlx::query(&query)
            .bind(&row.site)
            .bind(&row.title)
            .bind(&row.company)
            .bind(&row.city)
            .bind(&row.state)
            .bind(&row.job_type)
            .bind(&row.interval)
            .bind(row.min_amount)
            .bind(row.max_amount)
            .bind(&row.job_url)
            .bind(&row.description)
            .execute(self.get_pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// One TLS connection held for the whole run. Every statement commits on
/// its own.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(settings: &PgSettings) -> Result<PgStore, ScraperError> {
        let mut options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .database(&settings.dbname)
            .ssl_mode(PgSslMode::Require);
        if let Some(password) = &settings.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        info!(
            "Connected to PostgreSQL database {} at {}:{}",
            settings.dbname, settings.host, settings.port
        );
        Ok(PgStore { pool })
    }

    pub fn table(&self, name: &str) -> CategoryTable {
        CategoryTable {
            name: name.to_string(),
            pool: self.pool.clone(),
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Closed database pool");
    }
}

#[async_trait::async_trait]
impl Storage for PgStore {
    async fn ensure_table(&self, category: &str) -> Result<String, ScraperError> {
        let slug = table_slug(category);
        if slug.is_empty() {
            return Err(ScraperError::InvalidCategory(category.to_string()));
        }
        self.table(&slug).create().await?;
        debug!("Ensured table {}", slug);
        Ok(slug)
    }

    async fn insert_row(&self, table: &str, row: &JobRow) -> Result<Insert, ScraperError> {
        if self.table(table).insert(row).await? {
            Ok(Insert::Written)
        } else {
            Ok(Insert::Ignored)
        }
    }

    async fn row_count(&self, table: &str) -> Result<i64, ScraperError> {
        Ok(self.table(table).count().await?)
    }
}
