use crate::utils::quote_identifier;
use sqlx::{PgPool, Row};

#[async_trait::async_trait]
pub trait Table {
    type Record<'a>;

    fn get_name(&self) -> &str;
    fn get_pool(&self) -> &PgPool;

    async fn create(&self) -> Result<(), sqlx::Error>;
    /// Returns false when the record was ignored as a duplicate.
    async fn insert<'a>(&self, record: Self::Record<'a>) -> Result<bool, sqlx::Error>;

    async fn is_exist<I: AsRef<str> + Send + Sync>(&self, job_url: I) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT id FROM {} WHERE job_url = $1",
            quote_identifier(self.get_name())
        );
        Ok(sqlx::query(&query)
            .bind(job_url.as_ref())
            .fetch_optional(self.get_pool())
            .await?
            .is_some())
    }

    async fn count(&self) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {}",
            quote_identifier(self.get_name())
        );
        sqlx::query(&query)
            .fetch_one(self.get_pool())
            .await?
            .try_get(0)
    }
}
