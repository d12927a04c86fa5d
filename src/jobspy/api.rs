use crate::{listing::RawRecord, JobScraper, ResultSet, ScrapeRequest, ScraperError};
use serde::Deserialize;
use tracing::debug;

const SEARCH_PATH: &str = "/api/v1/search_jobs";

/// Client of a JobSpy HTTP service. Requests carry no timeout; a hanging
/// board blocks the run.
#[derive(Debug, Clone)]
pub struct JobSpyApi {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl JobSpyApi {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<JobSpyApi, ScraperError> {
        let client = reqwest::Client::builder().build()?;
        Ok(JobSpyApi {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SEARCH_PATH),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl JobScraper for JobSpyApi {
    async fn scrape(&self, request: &ScrapeRequest<'_>) -> Result<ResultSet, ScraperError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        debug!("POST {}", self.endpoint);
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScraperError::ScraperStatus { status, body });
        }
        parse_response(&body)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Rows(Vec<RawRecord>),
    Wrapped { jobs: Vec<RawRecord> },
}

fn parse_response(body: &str) -> Result<ResultSet, ScraperError> {
    let rows = match serde_json::from_str(body)? {
        SearchResponse::Rows(rows) => rows,
        SearchResponse::Wrapped { jobs } => jobs,
    };
    Ok(ResultSet::from(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{jobspy::stub::serve_once, ScrapePlan};
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoint_joins_base_url() {
        let api = JobSpyApi::new("http://localhost:8000/", Some(String::new())).unwrap();
        assert_eq!(api.endpoint(), "http://localhost:8000/api/v1/search_jobs");
        assert_eq!(api.api_key, None);
    }

    #[test]
    fn parses_plain_rows() {
        let result = parse_response(
            r#"[{"site": "indeed", "job_url": "https://in.indeed.com/viewjob?jk=1"}, {"site": "google"}]"#,
        )
        .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[1]["site"], "google");
    }

    #[test]
    fn parses_wrapped_rows() {
        let result = parse_response(
            r#"{"count": 1, "cached": false, "jobs": [{"SITE": "linkedin", "MIN_AMOUNT": null}]}"#,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0]["SITE"], "linkedin");
    }

    #[test]
    fn empty_result() {
        assert!(parse_response(r#"{"jobs": []}"#).unwrap().is_empty());
        assert!(parse_response("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_unexpected_body() {
        assert!(matches!(
            parse_response(r#"{"detail": "Not authenticated"}"#),
            Err(ScraperError::DecodeError(_))
        ));
        assert!(parse_response("<html></html>").is_err());
    }

    #[tokio::test]
    async fn error_status_is_a_scrape_failure() {
        let (addr, _) = serve_once("502 Bad Gateway", r#"{"detail": "blocked"}"#).await;
        let api = JobSpyApi::new(&format!("http://{}", addr), None).unwrap();
        let plan = ScrapePlan::default();

        let result = api.scrape(&plan.request("Sales", "Pune")).await;

        match result {
            Err(ScraperError::ScraperStatus { status, body }) => {
                assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
                assert_eq!(body, r#"{"detail": "blocked"}"#);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn posts_search_with_api_key() {
        let (addr, request) = serve_once(
            "200 OK",
            r#"{"count": 2, "jobs": [{"site": "indeed"}, {"site": "google"}]}"#,
        )
        .await;
        let api = JobSpyApi::new(&format!("http://{}/", addr), Some("secret".to_string())).unwrap();
        let plan = ScrapePlan::default();

        let result = api.scrape(&plan.request("Sales", "Pune")).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0]["site"], "indeed");

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /api/v1/search_jobs HTTP/1.1"));
        assert!(request.to_lowercase().contains("x-api-key: secret"));
        assert!(request.contains(r#""search_term":"Sales""#));
        assert!(request.contains(r#""location":"Pune""#));
    }

    #[tokio::test]
    async fn no_api_key_header_without_key() {
        let (addr, request) = serve_once("200 OK", "[]").await;
        let api = JobSpyApi::new(&format!("http://{}", addr), None).unwrap();
        let plan = ScrapePlan::default();

        assert!(api.scrape(&plan.request("Sales", "Pune")).await.unwrap().is_empty());

        let request = request.await.unwrap();
        assert!(!request.to_lowercase().contains("x-api-key"));
    }
}
