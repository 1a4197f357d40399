use url::Url;

/// Classifies hrefs as internal or external using a fixed list of host substrings
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    external_domains: Vec<String>,
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new(crate::config::InspectorConfig::default().external_domains)
    }
}

impl LinkClassifier {
    /// Create a classifier from a list of external host substrings
    pub fn new(external_domains: Vec<String>) -> Self {
        let external_domains = external_domains
            .into_iter()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self { external_domains }
    }

    /// Decide whether an href stays within the site.
    ///
    /// `tel:` links are external. `http(s)` links are external when their host
    /// contains one of the configured domains. Anything that fails to parse, and
    /// every other scheme or relative path, counts as internal.
    pub fn is_internal(&self, href: &str) -> bool {
        if href.starts_with("tel:") {
            return false;
        }

        if href.starts_with("http") {
            return match Url::parse(href) {
                Ok(url) => match url.host_str() {
                    Some(host) => !self.is_external_host(host),
                    None => true,
                },
                Err(e) => {
                    ::log::debug!("Treating unparsable href {:?} as internal: {}", href, e);
                    true
                }
            };
        }

        true
    }

    /// Check if a host matches any external domain (substring match)
    fn is_external_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.external_domains
            .iter()
            .any(|domain| host.contains(domain.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tel_is_external() {
        let classifier = LinkClassifier::default();
        assert!(!classifier.is_internal("tel:+3212345678"));
    }

    #[test]
    fn test_listed_domain_is_external() {
        let classifier = LinkClassifier::default();
        assert!(!classifier.is_internal("https://facebook.com/foo"));
        assert!(!classifier.is_internal("https://www.facebook.com/foo/bar?x=1"));
        assert!(!classifier.is_internal("http://goo.gl/abc"));
    }

    #[test]
    fn test_substring_not_suffix_match() {
        let classifier = LinkClassifier::new(vec!["facebook.com".to_string()]);
        assert!(!classifier.is_internal("https://facebook.com.example.org/"));
    }

    #[test]
    fn test_unlisted_domain_is_internal() {
        let classifier = LinkClassifier::default();
        assert!(classifier.is_internal("https://example.com/about"));
    }

    #[test]
    fn test_malformed_url_is_internal() {
        let classifier = LinkClassifier::default();
        assert!(classifier.is_internal("http://"));
        assert!(classifier.is_internal("https://[broken"));
    }

    #[test]
    fn test_other_schemes_and_relative_are_internal() {
        let classifier = LinkClassifier::default();
        assert!(classifier.is_internal("/contact"));
        assert!(classifier.is_internal("mailto:info@facebook.com"));
        assert!(classifier.is_internal("#top"));
        assert!(classifier.is_internal(""));
    }
}
