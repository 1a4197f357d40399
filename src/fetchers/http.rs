use super::FetchedPage;
use crate::config::InspectorConfig;
use crate::error::Result;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for page loads and sitemap probes
pub fn build_client(config: &InspectorConfig, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// Downloads a page over HTTP, following redirects
pub async fn fetch_page(url: &str, config: &InspectorConfig) -> Result<FetchedPage> {
    let client = build_client(config, Duration::from_secs(config.page_timeout_secs))?;
    let start = std::time::Instant::now();

    let response = client.get(url).send().await?.error_for_status()?;
    let final_url = response.url().to_string();
    let html = response.text().await?;

    ::log::info!(
        "Fetched {} ({} bytes) in {:.2} seconds",
        final_url,
        html.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(FetchedPage {
        url: final_url,
        html,
    })
}
