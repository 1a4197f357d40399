use scraper::{ElementRef, Html, Node};

/// Elements whose text never shows up on screen
const INVISIBLE_TEXT_PARENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element, whitespace-normalized.
///
/// Text nodes are concatenated as they appear, so `Buy<b>now</b>` reads
/// `Buynow`; script and style content is skipped.
pub fn element_text(element: &ElementRef) -> String {
    let raw = element
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) if !is_hidden(node.parent().and_then(ElementRef::wrap)) => {
                Some(&**text)
            }
            _ => None,
        })
        .collect::<String>();
    collapse_whitespace(&raw)
}

fn is_hidden(parent: Option<ElementRef>) -> bool {
    parent.is_some_and(|p| INVISIBLE_TEXT_PARENTS.contains(&p.value().name()))
}

/// Counts words in the body, skipping script and style content
pub fn word_count(doc: &Html) -> usize {
    let body_selector = super::selector("body");
    let Some(body) = doc.select(&body_selector).next() else {
        return 0;
    };

    body.descendants()
        .filter_map(|node| {
            let Node::Text(text) = node.value() else {
                return None;
            };
            if is_hidden(node.parent().and_then(ElementRef::wrap)) {
                None
            } else {
                Some(text.split_whitespace().count())
            }
        })
        .sum()
}
