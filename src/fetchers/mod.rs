pub mod http;
pub mod webdriver;

use crate::config::InspectorConfig;
use crate::error::{InspectError, Result};
use std::path::PathBuf;
use url::Url;

/// Where the inspected page comes from
#[derive(Debug, Clone)]
pub enum PageSource {
    /// Plain HTTP GET of the URL
    Http(String),
    /// Rendered through a WebDriver session, for script-built pages
    WebDriver(String),
    /// A saved HTML file; an optional URL stands in for the page address
    File(PathBuf, Option<String>),
}

/// The loaded page handed to the content script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL of the page (after redirects, for HTTP)
    pub url: String,
    pub html: String,
}

impl PageSource {
    /// Picks a source from a CLI argument: existing files are read from disk,
    /// anything else is fetched over HTTP
    pub fn detect(target: &str) -> Self {
        let path = PathBuf::from(target);
        if !target.starts_with("http://") && !target.starts_with("https://") && path.is_file() {
            PageSource::File(path, None)
        } else {
            PageSource::Http(target.to_string())
        }
    }

    /// Loads the page
    pub async fn fetch(&self, config: &InspectorConfig) -> Result<FetchedPage> {
        match self {
            PageSource::Http(url) => {
                validate_url(url)?;
                http::fetch_page(url, config).await
            }
            PageSource::WebDriver(url) => {
                validate_url(url)?;
                webdriver::fetch_page(url, config).await
            }
            PageSource::File(path, url) => {
                let html = tokio::fs::read_to_string(path).await?;
                let url = match url {
                    Some(url) => url.clone(),
                    None => file_url(path),
                };
                ::log::info!("Loaded {} bytes from {}", html.len(), path.display());
                Ok(FetchedPage { url, html })
            }
        }
    }
}

fn validate_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url).map_err(|e| InspectError::InvalidUrl(format!("{url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(InspectError::InvalidUrl(format!(
            "{url}: only http and https pages can be inspected"
        )));
    }
    Ok(())
}

fn file_url(path: &std::path::Path) -> String {
    std::fs::canonicalize(path)
        .ok()
        .and_then(|abs| Url::from_file_path(abs).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| format!("file://{}", path.display()))
}
