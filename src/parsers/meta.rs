use super::{selector, text};
use crate::results::{Overview, SocialMetadata};
use scraper::Html;

/// Reads title, meta tags and document attributes for the overview tab.
///
/// Heading counts and link/image totals are left at their defaults; the
/// caller fills them in from the other scanners.
pub fn overview(doc: &Html, url: &str) -> Overview {
    let mut overview = Overview {
        url: url.to_string(),
        title: doc
            .select(&selector("title"))
            .next()
            .map(|e| text::element_text(&e))
            .filter(|t| !t.is_empty()),
        word_count: text::word_count(doc),
        ..Overview::default()
    };

    for element in doc.select(&selector("meta")) {
        let value = element.value();

        if let Some(charset) = value.attr("charset") {
            overview.charset.get_or_insert_with(|| charset.trim().to_string());
        }

        let (Some(name), Some(content)) = (value.attr("name"), value.attr("content")) else {
            continue;
        };
        let content = content.trim().to_string();
        let slot = match name.trim().to_lowercase().as_str() {
            "description" => &mut overview.description,
            "keywords" => &mut overview.keywords,
            "robots" => &mut overview.robots,
            "viewport" => &mut overview.viewport,
            _ => continue,
        };
        // First occurrence wins, like document.querySelector
        slot.get_or_insert(content);
    }

    overview.canonical = doc
        .select(&selector("link[rel][href]"))
        .find(|e| {
            e.value()
                .attr("rel")
                .is_some_and(|rel| rel.eq_ignore_ascii_case("canonical"))
        })
        .and_then(|e| e.value().attr("href"))
        .map(|href| href.trim().to_string());

    overview.lang = doc
        .select(&selector("html"))
        .next()
        .and_then(|e| e.value().attr("lang"))
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty());

    overview
}

/// Collects Open Graph (`og:*`) and X/Twitter card (`twitter:*`) meta tags.
///
/// Keys are stored without their prefix. Open Graph tags are usually written
/// with `property`, Twitter tags with `name`, but both attributes are accepted
/// for either family. The first value for a key wins.
pub fn social(doc: &Html) -> SocialMetadata {
    let mut social = SocialMetadata::default();

    for element in doc.select(&selector("meta[content]")) {
        let value = element.value();
        let Some(key) = value.attr("property").or_else(|| value.attr("name")) else {
            continue;
        };
        let content = value.attr("content").unwrap_or_default().trim().to_string();
        let key = key.trim().to_lowercase();

        if let Some(og_key) = key.strip_prefix("og:") {
            social.og.entry(og_key.to_string()).or_insert(content);
        } else if let Some(twitter_key) = key.strip_prefix("twitter:") {
            social.twitter.entry(twitter_key.to_string()).or_insert(content);
        }
    }

    ::log::debug!(
        "Social scanner found {} og and {} twitter tags",
        social.og.len(),
        social.twitter.len()
    );
    social
}
