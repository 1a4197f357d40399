use crate::config::InspectorConfig;
use crate::error::Result;
use crate::fetchers::http::build_client;
use regex::Regex;
use reqwest::Client;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

static SITEMAP_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*sitemap[ \t]*:[ \t]*(\S+)").expect("valid sitemap regex")
});

/// Status assumed for any probe that errors or times out
const NOT_FOUND: u16 = 404;

/// The robots.txt and sitemap URLs shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterLinks {
    pub robots_url: String,
    pub sitemap_url: String,
}

/// Finds a working sitemap URL for a site
pub struct SitemapResolver {
    client: Client,
    probe_timeout: Duration,
    candidate_paths: Vec<String>,
}

impl SitemapResolver {
    pub fn new(config: &InspectorConfig) -> Result<Self> {
        let probe_timeout = Duration::from_secs(config.probe_timeout_secs);
        Ok(Self {
            client: build_client(config, probe_timeout)?,
            probe_timeout,
            candidate_paths: config.sitemap_paths.clone(),
        })
    }

    /// Resolves the sitemap for `domain` (an origin such as `https://acme.example`).
    ///
    /// Order: sitemaps declared in robots.txt, then sitemap links embedded in
    /// the page (`page_links` is only awaited if robots.txt gave nothing that
    /// exists), then the conventional paths. Falls back to `/sitemap.xml`
    /// without checking it.
    pub async fn resolve<F>(&self, domain: &str, page_links: F) -> String
    where
        F: Future<Output = Vec<String>>,
    {
        let domain = domain.trim_end_matches('/');

        let declared = self.robots_sitemaps(domain).await;
        if let Some(found) = self.first_existing(&declared).await {
            ::log::info!("Sitemap from robots.txt: {}", found);
            return found;
        }

        let embedded = page_links.await;
        if let Some(found) = self.first_existing(&embedded).await {
            ::log::info!("Sitemap linked from page: {}", found);
            return found;
        }

        let conventional = self
            .candidate_paths
            .iter()
            .map(|path| format!("{domain}{path}"))
            .collect::<Vec<_>>();
        if let Some(found) = self.first_existing(&conventional).await {
            ::log::info!("Sitemap at conventional path: {}", found);
            return found;
        }

        ::log::info!("No sitemap found for {}, using default path", domain);
        format!("{domain}/sitemap.xml")
    }

    /// Footer links for a site; the page's own sitemap links are consulted lazily
    pub async fn footer_links<F>(&self, domain: &str, page_links: F) -> FooterLinks
    where
        F: Future<Output = Vec<String>>,
    {
        FooterLinks {
            robots_url: crate::utils::robots_url(domain),
            sitemap_url: self.resolve(domain, page_links).await,
        }
    }

    /// Sitemap URLs declared in the site's robots.txt; empty when it is missing
    pub async fn robots_sitemaps(&self, domain: &str) -> Vec<String> {
        let robots_url = crate::utils::robots_url(domain);
        let request = self.client.get(&robots_url).send();

        let body = match timeout(self.probe_timeout, request).await {
            Ok(Ok(response)) if response.status().is_success() => {
                match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        ::log::debug!("Failed to read {}: {}", robots_url, e);
                        return Vec::new();
                    }
                }
            }
            Ok(Ok(response)) => {
                ::log::debug!("{} returned {}", robots_url, response.status());
                return Vec::new();
            }
            Ok(Err(e)) => {
                ::log::debug!("Failed to fetch {}: {}", robots_url, e);
                return Vec::new();
            }
            Err(_) => {
                ::log::debug!("Timeout fetching {}", robots_url);
                return Vec::new();
            }
        };

        parse_robots_sitemaps(&body, domain)
    }

    /// HTTP status of a HEAD request; 404 on any failure or timeout
    pub async fn probe(&self, url: &str) -> u16 {
        match timeout(self.probe_timeout, self.client.head(url).send()).await {
            Ok(Ok(response)) => response.status().as_u16(),
            Ok(Err(e)) => {
                ::log::debug!("Probe of {} failed: {}", url, e);
                NOT_FOUND
            }
            Err(_) => {
                ::log::debug!("Probe of {} timed out", url);
                NOT_FOUND
            }
        }
    }

    pub async fn exists(&self, url: &str) -> bool {
        (200..400).contains(&self.probe(url).await)
    }

    /// First candidate that answers with a 2xx/3xx status, probing in order
    pub async fn first_existing(&self, candidates: &[String]) -> Option<String> {
        for candidate in candidates {
            if self.exists(candidate).await {
                return Some(candidate.clone());
            }
        }
        None
    }
}

/// Extracts `Sitemap:` directive values, resolving relative ones against `domain`.
/// Empty directives and non-http(s) values are skipped.
pub fn parse_robots_sitemaps(robots: &str, domain: &str) -> Vec<String> {
    let base = Url::parse(&format!("{}/", domain.trim_end_matches('/'))).ok();

    SITEMAP_DIRECTIVE
        .captures_iter(robots)
        .filter_map(|caps| {
            let value = caps.get(1)?.as_str();
            match Url::parse(value) {
                Ok(url) => Some(url),
                Err(_) => base.as_ref()?.join(value).ok(),
            }
        })
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|url| url.to_string())
        .collect()
}
