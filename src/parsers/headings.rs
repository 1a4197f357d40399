use super::{selector, text};
use crate::results::{HeadingCounts, HeadingRecord};
use scraper::{ElementRef, Html};

/// Containers that mark a heading as part of the site chrome rather than content
const NAVIGATION_CONTAINERS: [&str; 4] = ["nav", "header", "footer", "aside"];

/// Collects h1-h6 elements in document order
pub fn scan(doc: &Html) -> Vec<HeadingRecord> {
    doc.select(&selector("h1, h2, h3, h4, h5, h6"))
        .filter_map(|element| {
            let level = heading_level(element.value().name())?;
            Some(HeadingRecord {
                level,
                text: text::element_text(&element),
                id: element.value().attr("id").unwrap_or_default().to_string(),
                // Markup order; scraper's class set does not keep it
                classes: element
                    .value()
                    .attr("class")
                    .map(text::collapse_whitespace)
                    .unwrap_or_default(),
                is_navigation: is_in_navigation(&element),
            })
        })
        .collect()
}

pub fn count(structure: &[HeadingRecord]) -> HeadingCounts {
    let mut counts = HeadingCounts::default();
    for heading in structure {
        counts.record(heading.level);
    }
    counts
}

fn heading_level(name: &str) -> Option<u8> {
    let level = name.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn is_in_navigation(element: &ElementRef) -> bool {
    element.ancestors().filter_map(ElementRef::wrap).any(|ancestor| {
        let value = ancestor.value();
        NAVIGATION_CONTAINERS.contains(&value.name())
            || value
                .attr("role")
                .is_some_and(|role| role.eq_ignore_ascii_case("navigation"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_keep_markup_order() {
        let doc = Html::parse_document(
            r#"<h2 class=" zeta  alpha
               mid omega">A</h2><h3>B</h3>"#,
        );
        let structure = scan(&doc);
        assert_eq!(structure[0].classes, "zeta alpha mid omega");
        assert_eq!(structure[1].classes, "");
    }

    #[test]
    fn test_heading_level_bounds() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("header"), None);
    }
}
