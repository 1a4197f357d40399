use super::FetchedPage;
use crate::config::InspectorConfig;
use crate::error::{InspectError, Result};
use fantoccini::{Client, ClientBuilder};
use tokio::time::{Duration, timeout};

/// Alternative endpoints tried when the configured WebDriver URL is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // geckodriver / Selenium default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Loads a page in a WebDriver-controlled browser and returns the rendered DOM.
///
/// The `WEBDRIVER_URL` environment variable overrides the configured endpoint.
pub async fn fetch_page(url: &str, config: &InspectorConfig) -> Result<FetchedPage> {
    let webdriver_url = std::env::var("WEBDRIVER_URL")
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| config.webdriver_url.clone());

    let client = connect_to_webdriver(&webdriver_url).await?;
    let start = std::time::Instant::now();

    let result = timeout(
        Duration::from_secs(config.page_timeout_secs),
        render(&client, url),
    )
    .await;

    // Close the session whatever happened to the page load
    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close WebDriver session: {}", e);
    }

    let page = match result {
        Ok(page) => page?,
        Err(_) => {
            ::log::error!("Timeout rendering: {}", url);
            return Err(InspectError::Timeout(format!(
                "{}s rendering {url}",
                config.page_timeout_secs
            )));
        }
    };

    ::log::info!(
        "Rendered {} ({} bytes) in {:.2} seconds",
        page.url,
        page.html.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(page)
}

async fn render(client: &Client, url: &str) -> Result<FetchedPage> {
    client
        .goto(url)
        .await
        .map_err(|e| log_navigation_error(e, "accessing", url))?;

    let html = client
        .source()
        .await
        .map_err(|e| log_navigation_error(e, "getting source for", url))?;

    let final_url = client
        .current_url()
        .await
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string());

    Ok(FetchedPage {
        url: final_url,
        html,
    })
}

/// Connects to the WebDriver instance, trying common local endpoints on failure
async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client> {
    let first_error = match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        // Fallback failures are not logged individually to avoid log spam
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(first_error.into())
}

fn log_navigation_error(
    error: fantoccini::error::CmdError,
    context: &str,
    url: &str,
) -> InspectError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, url);
    } else {
        ::log::error!("Failed {} {}: {}", context, url, error);
    }
    error.into()
}
