use crate::{jobspy::Site, ScrapeRequest, ScraperError};
use itertools::Itertools;

pub const CATEGORIES: [&str; 18] = [
    "Software Engineering",
    "Engineering and Development",
    "Data Analysis",
    "Accounting and Finance",
    "Machine Learning and AI",
    "Consulting",
    "Marketing",
    "Management and Executive",
    "Product Management",
    "Arts and Entertainment",
    "Legal and Compliance",
    "Education and Training",
    "Business Analyst",
    "Creatives and Design",
    "Customer Service and Support",
    "Human Resources",
    "Public Sector and Government",
    "Sales",
];

pub const CITIES: [&str; 10] = [
    "New Delhi",
    "Mumbai",
    "Bengaluru",
    "Chennai",
    "Kolkata",
    "Hyderabad",
    "Pune",
    "Ahmedabad",
    "Jaipur",
    "Lucknow",
];

pub const COUNTRY: &str = "India";
pub const RESULTS_WANTED: u32 = 20;

pub const SITES: [Site; 5] = [
    Site::Indeed,
    Site::Linkedin,
    Site::Glassdoor,
    Site::ZipRecruiter,
    Site::Google,
];

pub const PROXIES: [&str; 40] = [
    "44.195.247.145:80",
    "184.169.154.119:80",
    "3.21.101.158:3128",
    "203.77.215.45:10000",
    "3.90.100.12:80",
    "47.251.43.115:33333",
    "102.223.186.246:8888",
    "203.144.144.146:8080",
    "103.152.112.120:80",
    "23.247.136.245:80",
    "23.247.136.254:80",
    "103.152.112.157:80",
    "13.208.56.180:80",
    "35.72.118.126:80",
    "43.202.154.212:80",
    "35.76.62.196:80",
    "35.79.120.242:3128",
    "18.228.149.161:80",
    "3.139.242.184:80",
    "43.200.77.128:3128",
    "43.201.121.81:80",
    "54.233.119.172:3128",
    "18.228.198.164:80",
    "52.67.10.183:80",
    "204.236.176.61:3128",
    "54.152.3.36:80",
    "54.248.238.110:80",
    "162.19.107.209:3128",
    "63.35.64.177:3128",
    "134.209.23.180:8888",
    "204.236.137.68:80",
    "114.35.140.157:8080",
    "41.59.90.171:80",
    "141.11.103.136:8080",
    "44.219.175.186:80",
    "158.255.77.166:80",
    "23.247.137.142:80",
    "20.205.61.143:80",
    "178.128.113.118:23128",
    "133.18.234.13:80",
];

pub const DEFAULT_PG_PORT: u16 = 5432;

/// Connection parameters of the destination database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgSettings {
    pub host: String,
    pub dbname: String,
    pub user: String,
    pub password: Option<String>,
    pub port: u16,
}

impl PgSettings {
    pub fn from_env() -> Result<PgSettings, ScraperError> {
        PgSettings::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<PgSettings, ScraperError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ScraperError::MissingEnv(name));

        let port = match lookup("PG_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ScraperError::InvalidEnv {
                    name: "PG_PORT",
                    value,
                })?,
            None => DEFAULT_PG_PORT,
        };

        Ok(PgSettings {
            host: required("PG_HOST")?,
            dbname: required("PG_DBNAME")?,
            user: required("PG_USER")?,
            password: lookup("PG_PASSWORD"),
            port,
        })
    }
}

/// Everything a run iterates over, passed explicitly to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapePlan {
    pub categories: Vec<String>,
    pub cities: Vec<String>,
    pub country: String,
    pub sites: Vec<Site>,
    pub results_wanted: u32,
    pub verbose: u8,
    pub linkedin_fetch_description: bool,
    pub proxies: Vec<String>,
}

impl Default for ScrapePlan {
    fn default() -> Self {
        ScrapePlan {
            categories: CATEGORIES.iter().map(ToString::to_string).collect(),
            cities: CITIES.iter().map(ToString::to_string).collect(),
            country: COUNTRY.to_string(),
            sites: SITES.to_vec(),
            results_wanted: RESULTS_WANTED,
            verbose: 1,
            linkedin_fetch_description: true,
            proxies: PROXIES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ScrapePlan {
    pub fn only_categories(mut self, filter: &[String]) -> Self {
        self.categories = restrict(self.categories, filter);
        self
    }

    pub fn only_cities(mut self, filter: &[String]) -> Self {
        self.cities = restrict(self.cities, filter);
        self
    }

    pub fn request<'a>(&'a self, category: &'a str, city: &'a str) -> ScrapeRequest<'a> {
        ScrapeRequest {
            site_name: &self.sites,
            search_term: category,
            location: city,
            country_indeed: &self.country,
            results_wanted: self.results_wanted,
            verbose: self.verbose,
            linkedin_fetch_description: self.linkedin_fetch_description,
            proxies: &self.proxies,
        }
    }
}

/// Keep configured entries named by the filter (case-insensitive) in their
/// configured order, then append filter entries that are not configured.
/// An empty filter keeps everything.
fn restrict(configured: Vec<String>, filter: &[String]) -> Vec<String> {
    if filter.is_empty() {
        return configured;
    }

    let wanted: Vec<String> = filter
        .iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .unique_by(|f| f.to_lowercase())
        .collect();

    let mut kept: Vec<String> = configured
        .into_iter()
        .filter(|c| wanted.iter().any(|w| w.eq_ignore_ascii_case(c)))
        .collect();
    let extra: Vec<String> = wanted
        .into_iter()
        .filter(|w| !kept.iter().any(|c| c.eq_ignore_ascii_case(w)))
        .collect();
    kept.extend(extra);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn default_plan_covers_every_pair() {
        let plan = ScrapePlan::default();
        assert_eq!(plan.categories.len() * plan.cities.len(), 180);
        assert_eq!(plan.country, "India");
        assert_eq!(plan.results_wanted, 20);
        assert_eq!(plan.proxies.len(), 40);
    }

    #[test]
    fn filters_keep_configured_order() {
        let plan = ScrapePlan::default()
            .only_categories(&strings(&["sales", "Data Analysis"]))
            .only_cities(&strings(&["Lucknow", "pune", "Pune", "Surat"]));

        assert_eq!(plan.categories, strings(&["Data Analysis", "Sales"]));
        assert_eq!(plan.cities, strings(&["Pune", "Lucknow", "Surat"]));
    }

    #[test]
    fn empty_filter_keeps_defaults() {
        let plan = ScrapePlan::default().only_cities(&[]);
        assert_eq!(plan.cities, strings(&CITIES));
    }

    #[test]
    fn pg_settings_default_port() {
        let env: HashMap<&str, &str> = [
            ("PG_HOST", "db.example.com"),
            ("PG_DBNAME", "jobs"),
            ("PG_USER", "scraper"),
        ]
        .into_iter()
        .collect();

        let settings =
            PgSettings::from_lookup(|name| env.get(name).map(ToString::to_string)).unwrap();
        assert_eq!(
            settings,
            PgSettings {
                host: "db.example.com".to_string(),
                dbname: "jobs".to_string(),
                user: "scraper".to_string(),
                password: None,
                port: 5432,
            }
        );
    }

    #[test]
    fn pg_settings_errors() {
        let missing = PgSettings::from_lookup(|_| None);
        assert!(matches!(missing, Err(ScraperError::MissingEnv("PG_HOST"))));

        let bad_port = PgSettings::from_lookup(|name| match name {
            "PG_PORT" => Some("five".to_string()),
            _ => Some("x".to_string()),
        });
        assert!(matches!(
            bad_port,
            Err(ScraperError::InvalidEnv {
                name: "PG_PORT",
                ..
            })
        ));
    }
}
