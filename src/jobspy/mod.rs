mod api;
pub mod proxy;
#[cfg(test)]
mod stub;

pub use api::JobSpyApi;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Indeed,
    Linkedin,
    Glassdoor,
    #[value(name = "zip_recruiter")]
    ZipRecruiter,
    Google,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Site::Indeed => "indeed",
            Site::Linkedin => "linkedin",
            Site::Glassdoor => "glassdoor",
            Site::ZipRecruiter => "zip_recruiter",
            Site::Google => "google",
        };
        f.write_str(name)
    }
}

/// One search, i.e. one (category, city) pair.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRequest<'a> {
    pub site_name: &'a [Site],
    pub search_term: &'a str,
    pub location: &'a str,
    pub country_indeed: &'a str,
    pub results_wanted: u32,
    pub verbose: u8,
    pub linkedin_fetch_description: bool,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub proxies: &'a [String],
}
