//! Optional pre-flight check of the proxy list.

use futures::future::join_all;
use lazy_regex::regex;
use std::time::Duration;
use tracing::{debug, info, warn};

const CHECK_URL: &str = "https://httpbin.org/ip";
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// `host:port` with a numeric port.
pub fn is_proxy_address(proxy: &str) -> bool {
    match regex!(r"^[A-Za-z0-9.\-]+:(\d{1,5})$").captures(proxy) {
        Some(caps) => caps[1].parse::<u16>().map(|p| p > 0).unwrap_or(false),
        None => false,
    }
}

/// Whether a request through the proxy succeeds within the timeout.
pub async fn check_proxy(proxy: &str) -> bool {
    check_proxy_against(proxy, CHECK_URL).await
}

async fn check_proxy_against(proxy: &str, check_url: &str) -> bool {
    let client = reqwest::Proxy::all(format!("http://{}", proxy)).and_then(|p| {
        reqwest::Client::builder()
            .proxy(p)
            .timeout(CHECK_TIMEOUT)
            .build()
    });
    let client = match client {
        Ok(client) => client,
        Err(e) => {
            debug!("Proxy {} unusable: {}", proxy, e);
            return false;
        }
    };

    match client.get(check_url).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            debug!("Proxy {} failed: {}", proxy, e);
            false
        }
    }
}

/// Keep the proxies that answer, in their original order.
pub async fn working_proxies(proxies: &[String]) -> Vec<String> {
    working_proxies_against(proxies, CHECK_URL).await
}

async fn working_proxies_against(proxies: &[String], check_url: &str) -> Vec<String> {
    let candidates: Vec<&String> = proxies
        .iter()
        .filter(|p| {
            let ok = is_proxy_address(p);
            if !ok {
                warn!("Dropping malformed proxy {:?}", p);
            }
            ok
        })
        .collect();

    let checks = join_all(
        candidates
            .iter()
            .map(|p| check_proxy_against(p, check_url)),
    )
    .await;
    let working: Vec<String> = candidates
        .into_iter()
        .zip(checks)
        .filter_map(|(p, ok)| ok.then(|| p.clone()))
        .collect();

    info!("Working proxies: {}/{}", working.len(), proxies.len());
    working
}
