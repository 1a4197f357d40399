use super::selector;
use crate::results::ImageRecord;
use scraper::{ElementRef, Html};

/// Collects every `<img>` element in document order
pub fn scan(doc: &Html) -> Vec<ImageRecord> {
    let images = doc
        .select(&selector("img"))
        .map(|element| {
            let value = element.value();
            // Lazy-loading markup keeps the real source in data-src
            let src = value
                .attr("src")
                .filter(|s| !s.trim().is_empty())
                .or_else(|| value.attr("data-src"))
                .unwrap_or_default();

            let width = dimension(value.attr("width"));
            let height = dimension(value.attr("height"));

            ImageRecord {
                src: src.to_string(),
                alt: value.attr("alt").unwrap_or_default().to_string(),
                title: value.attr("title").unwrap_or_default().to_string(),
                width,
                height,
                is_visible: is_visible(&element),
            }
        })
        .collect::<Vec<_>>();

    ::log::debug!("Image scanner found {} images", images.len());
    images
}

/// Parses a width/height attribute ("120", "120px"); anything else is 0
fn dimension(attr: Option<&str>) -> u32 {
    attr.map(|v| v.trim().trim_end_matches("px").trim())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u32)
        .unwrap_or(0)
}

fn is_visible(element: &ElementRef) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() {
        return false;
    }

    if let Some(style) = value.attr("style") {
        let style = style.to_lowercase().replace(' ', "");
        if style.contains("display:none") || style.contains("visibility:hidden") {
            return false;
        }
    }

    let explicit_zero = |attr: &str| value.attr(attr).is_some_and(|v| v.trim() == "0");
    !(explicit_zero("width") || explicit_zero("height"))
}
