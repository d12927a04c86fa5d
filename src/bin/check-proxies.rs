use jobs_scraper::{config, jobspy::proxy};

async fn check_proxies() {
    let proxies: Vec<String> = config::PROXIES.iter().map(ToString::to_string).collect();
    let working = proxy::working_proxies(&proxies).await;
    println!("Working proxies: {:?}", working);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    check_proxies().await;
}
