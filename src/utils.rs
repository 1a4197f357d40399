use url::Url;

/// Origin of a page URL as shown in the footer, e.g. `https://www.acme.example`
pub fn display_domain(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    Some(format!("{}://{}{}", url.scheme(), host, port))
}

/// Short label used in export filenames: the first DNS label of the host;
/// `page` when the URL has no host.
///
/// A leading `www.` is skipped first, so `www.acme.example` gives `acme`
/// rather than `www`.
pub fn filename_label(page_url: &str) -> String {
    let host = Url::parse(page_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string));

    let label = host
        .as_deref()
        .map(|h| h.strip_prefix("www.").unwrap_or(h))
        .and_then(|h| h.split('.').next())
        .map(sanitize_filename)
        .unwrap_or_default();

    if label.is_empty() { "page".to_string() } else { label }
}

/// `{label}_{kind}.{ext}`
pub fn export_filename(page_url: &str, kind: &str, ext: &str) -> String {
    format!("{}_{}.{}", filename_label(page_url), kind, ext)
}

pub fn robots_url(domain: &str) -> String {
    format!("{}/robots.txt", domain.trim_end_matches('/'))
}

/// Convert a string to a sanitized filename
pub fn sanitize_filename(name: &str) -> String {
    let name = name.replace(['/', '\\', ':', '?', '&', '=', '#', '%', '[', ']'], "_");

    // Limit filename length
    if name.len() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_domain() {
        assert_eq!(
            display_domain("https://www.acme.example/a/b?c=1"),
            Some("https://www.acme.example".to_string())
        );
        assert_eq!(
            display_domain("http://localhost:8080/x"),
            Some("http://localhost:8080".to_string())
        );
        assert_eq!(display_domain("file:///tmp/page.html"), None);
        assert_eq!(display_domain("not a url"), None);
    }

    #[test]
    fn test_filename_label() {
        assert_eq!(filename_label("https://www.acme.example/"), "acme");
        assert_eq!(filename_label("https://shop.acme.example/"), "shop");
        assert_eq!(filename_label("file:///tmp/page.html"), "page");
        assert_eq!(filename_label("http://127.0.0.1:3000/"), "127");
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("https://acme.example/", "images", "csv"),
            "acme_images.csv"
        );
    }

    #[test]
    fn test_robots_url() {
        assert_eq!(robots_url("https://a.example/"), "https://a.example/robots.txt");
    }
}
