// Re-export modules
pub mod config;
pub mod error;
pub mod export;
pub mod fetchers;
pub mod filter;
pub mod messaging;
pub mod parsers;
pub mod popup;
pub mod render;
pub mod results;
pub mod schema;
pub mod sitemap;
pub mod tooltip;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::InspectorConfig;
pub use error::{InspectError, Result};
pub use fetchers::{FetchedPage, PageSource};
pub use popup::PopupSession;
pub use render::{RenderedTab, Tab};

/// Main builder for an inspection session over one page
pub struct Inspector {
    source: PageSource,
    config: InspectorConfig,
}

impl Inspector {
    /// Create a new Inspector for the given page source
    pub fn new(source: PageSource) -> Self {
        Self {
            source,
            config: InspectorConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: InspectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = InspectorConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set the timeout for each sitemap/robots probe
    pub fn with_probe_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.probe_timeout_secs = timeout_seconds.max(1);
        self
    }

    /// Set the timeout for loading the page itself
    pub fn with_page_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.page_timeout_secs = timeout_seconds.max(1);
        self
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Load the page and connect a popup session to it
    pub async fn open(self) -> Result<PopupSession> {
        let page = self.source.fetch(&self.config).await?;
        ::log::info!("Loaded {} ({} bytes)", page.url, page.html.len());
        PopupSession::open(page, &self.config)
    }
}
