pub mod headings;
pub mod images;
pub mod links;
pub mod meta;
pub mod schema;
pub mod text;


use crate::filter::LinkClassifier;
use crate::results::{
    HeadingCounts, HeadingRecord, ImageRecord, LinkMetrics, LinkRecord, Overview, PageSummary,
    SchemaRecord, SocialMetadata,
};
use scraper::{Html, Selector};
use url::Url;

/// Parse a selector literal known at compile time
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e:?}"))
}

/// A parsed page, the snapshot every scanner reads from
pub struct PageDocument {
    url: String,
    doc: Html,
}

impl PageDocument {
    /// Parses a page's HTML source
    pub fn parse(url: &str, html: &str) -> Self {
        Self {
            url: url.to_string(),
            doc: Html::parse_document(html),
        }
    }

    /// Base URL for resolving relative references, if the page URL is absolute
    pub fn base_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }

    pub fn links(&self, classifier: &LinkClassifier) -> Vec<LinkRecord> {
        links::scan(&self.doc, classifier)
    }

    pub fn link_metrics(&self, classifier: &LinkClassifier) -> (Vec<LinkRecord>, LinkMetrics) {
        let all = self.links(classifier);
        let metrics = links::metrics(&all);
        (all, metrics)
    }

    pub fn headings(&self) -> (HeadingCounts, Vec<HeadingRecord>) {
        let structure = headings::scan(&self.doc);
        let counts = headings::count(&structure);
        (counts, structure)
    }

    pub fn images(&self) -> Vec<ImageRecord> {
        images::scan(&self.doc)
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            total_links: self.doc.select(&selector("a[href]")).count(),
            total_images: self.doc.select(&selector("img")).count(),
        }
    }

    pub fn overview(&self) -> Overview {
        let (counts, _) = self.headings();
        let mut overview = meta::overview(&self.doc, &self.url);
        overview.headings = counts;
        overview.summary = self.summary();
        overview
    }

    pub fn social(&self) -> SocialMetadata {
        meta::social(&self.doc)
    }

    pub fn schemas(&self) -> Vec<SchemaRecord> {
        schema::extract(&self.doc)
    }

    pub fn sitemap_links(&self) -> Vec<String> {
        links::sitemap_links(&self.doc, self.base_url().as_ref())
    }
}
