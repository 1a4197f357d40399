use crate::error::{InspectError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for a page inspection session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorConfig {
    /// Host substrings that mark a link as external
    #[serde(default = "default_external_domains")]
    pub external_domains: Vec<String>,

    /// Conventional sitemap paths probed when robots.txt and the page give nothing
    #[serde(default = "default_sitemap_paths")]
    pub sitemap_paths: Vec<String>,

    /// Timeout for each sitemap/robots probe, in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Timeout for loading the inspected page, in seconds
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Field delimiter for CSV exports
    #[serde(default = "default_csv_delimiter")]
    pub csv_delimiter: char,

    /// User agent sent with HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            external_domains: default_external_domains(),
            sitemap_paths: default_sitemap_paths(),
            probe_timeout_secs: default_probe_timeout_secs(),
            page_timeout_secs: default_page_timeout_secs(),
            csv_delimiter: default_csv_delimiter(),
            user_agent: default_user_agent(),
            webdriver_url: default_webdriver_url(),
        }
    }
}

impl InspectorConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.csv_delimiter.is_ascii() {
            return Err(InspectError::Config(format!(
                "csv_delimiter must be ASCII, got {:?}",
                self.csv_delimiter
            )));
        }
        if self.probe_timeout_secs == 0 {
            return Err(InspectError::Config(
                "probe_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_external_domains() -> Vec<String> {
    [
        "facebook.com",
        "instagram.com",
        "linkedin.com",
        "twitter.com",
        "youtube.com",
        "pinterest.com",
        "tiktok.com",
        "whatsapp.com",
        "goo.gl",
        "maps.google.com",
        "btwcalculator.be",
    ]
    .iter()
    .map(|d| d.to_string())
    .collect()
}

fn default_sitemap_paths() -> Vec<String> {
    [
        "/sitemap_index.xml",
        "/sitemap.xml",
        "/sitemap-index.xml",
        "/sitemapindex.xml",
        "/wp-sitemap.xml",
        "/sitemap.php",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_page_timeout_secs() -> u64 {
    30
}

fn default_csv_delimiter() -> char {
    ';'
}

fn default_user_agent() -> String {
    format!("seo-lens/{}", env!("CARGO_PKG_VERSION"))
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = InspectorConfig::from_json("{}").unwrap();
        assert_eq!(config.csv_delimiter, ';');
        assert_eq!(config.probe_timeout_secs, 5);
        assert_eq!(config.sitemap_paths[0], "/sitemap_index.xml");
        assert!(config.external_domains.iter().any(|d| d == "facebook.com"));
    }

    #[test]
    fn test_partial_override() {
        let config =
            InspectorConfig::from_json(r#"{"csv_delimiter": ",", "external_domains": ["a.com"]}"#)
                .unwrap();
        assert_eq!(config.csv_delimiter, ',');
        assert_eq!(config.external_domains, vec!["a.com".to_string()]);
        assert_eq!(config.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = InspectorConfig::from_json(r#"{"probe_timeout_secs": 0}"#);
        assert!(matches!(result, Err(InspectError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"page_timeout_secs": 12}}"#).unwrap();

        let config = InspectorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.page_timeout_secs, 12);
    }
}
