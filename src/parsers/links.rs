use super::{selector, text};
use crate::filter::LinkClassifier;
use crate::results::{LinkMetrics, LinkRecord};
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Collects every anchor with an href, in document order
pub fn scan(doc: &Html, classifier: &LinkClassifier) -> Vec<LinkRecord> {
    let links = doc
        .select(&selector("a[href]"))
        .filter_map(|element| {
            let href = element.value().attr("href")?.to_string();
            let text = text::element_text(&element);
            Some(LinkRecord {
                is_internal: classifier.is_internal(&href),
                has_text: !text.is_empty(),
                href,
                text,
            })
        })
        .collect::<Vec<_>>();

    ::log::debug!("Link scanner found {} links", links.len());
    links
}

/// Keeps the first record for each raw href
pub fn unique(links: &[LinkRecord]) -> Vec<LinkRecord> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter(|link| seen.insert(link.href.as_str()))
        .cloned()
        .collect()
}

/// Computes aggregate counts over all links
pub fn metrics(links: &[LinkRecord]) -> LinkMetrics {
    let unique_links = unique(links);
    let total_internal = links.iter().filter(|l| l.is_internal).count();

    LinkMetrics {
        total: links.len(),
        unique: unique_links.len(),
        total_internal,
        total_external: links.len() - total_internal,
        unique_links,
    }
}

/// Finds sitemap URLs referenced by the page itself.
///
/// Looks at `<link rel="sitemap">` and at anchors whose href mentions "sitemap".
/// Relative references are resolved against `base` when one is given; entries
/// that cannot be made absolute are dropped.
pub fn sitemap_links(doc: &Html, base: Option<&Url>) -> Vec<String> {
    let link_selector = selector("link[rel]");
    let anchor_selector = selector("a[href]");

    let rel_links = doc
        .select(&link_selector)
        .filter(|e| {
            e.value()
                .attr("rel")
                .is_some_and(|rel| rel.eq_ignore_ascii_case("sitemap"))
        })
        .filter_map(|e| e.value().attr("href"));

    let anchors = doc
        .select(&anchor_selector)
        .filter_map(|e| e.value().attr("href"))
        .filter(|href| href.to_lowercase().contains("sitemap"));

    let mut seen = HashSet::new();
    rel_links
        .chain(anchors)
        .filter_map(|href| {
            let resolved = match base {
                Some(base) => base.join(href).ok(),
                None => Url::parse(href).ok(),
            };
            resolved.filter(|url| matches!(url.scheme(), "http" | "https"))
        })
        .map(|url| url.to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
