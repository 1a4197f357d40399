use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A hyperlink found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Raw `href` attribute, exactly as written in the markup
    pub href: String,

    /// Trimmed visible anchor text
    pub text: String,

    /// Whether the link points inside the site
    pub is_internal: bool,

    /// Whether the anchor has any visible text
    pub has_text: bool,
}

/// Aggregate counts over the links of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMetrics {
    pub total: usize,
    pub unique: usize,
    pub total_internal: usize,
    pub total_external: usize,
    pub unique_links: Vec<LinkRecord>,
}

/// An `<img>` element found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub src: String,
    pub alt: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub is_visible: bool,
}

impl ImageRecord {
    /// True when the image has no usable alt text
    pub fn is_missing_alt(&self) -> bool {
        self.alt.trim().is_empty()
    }
}

/// A heading element, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingRecord {
    /// Heading level, 1 through 6
    pub level: u8,
    pub text: String,
    pub id: String,
    pub classes: String,

    /// Whether the heading sits inside navigation chrome (nav, header, footer, aside)
    pub is_navigation: bool,
}

/// Number of headings per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
    pub h6: usize,
}

impl HeadingCounts {
    /// Increment the counter for a heading level; out-of-range levels are ignored
    pub fn record(&mut self, level: u8) {
        match level {
            1 => self.h1 += 1,
            2 => self.h2 += 1,
            3 => self.h3 += 1,
            4 => self.h4 += 1,
            5 => self.h5 += 1,
            6 => self.h6 += 1,
            _ => {}
        }
    }

    /// Count for a given level (0 for levels outside 1..=6)
    pub fn get(&self, level: u8) -> usize {
        match level {
            1 => self.h1,
            2 => self.h2,
            3 => self.h3,
            4 => self.h4,
            5 => self.h5,
            6 => self.h6,
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.h1 + self.h2 + self.h3 + self.h4 + self.h5 + self.h6
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub total_links: usize,
    pub total_images: usize,
}

/// A Microdata `itemprop` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProperty {
    pub name: String,
    pub value: String,
}

/// One structured-data block (JSON-LD or Microdata)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaRecord {
    /// Declared schema.org type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Parsed JSON-LD value (may contain an `@graph` array)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,

    /// Microdata properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<SchemaProperty>>,
}

impl SchemaRecord {
    /// Display name of the type, or "Unknown" when none was declared
    pub fn type_name(&self) -> &str {
        self.schema_type.as_deref().unwrap_or("Unknown")
    }

    pub fn is_rating(&self) -> bool {
        self.schema_type
            .as_deref()
            .is_some_and(|t| t.contains("Rating"))
    }
}

/// Open Graph and X/Twitter card metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMetadata {
    pub og: BTreeMap<String, String>,
    pub twitter: BTreeMap<String, String>,
}

impl SocialMetadata {
    pub fn is_empty(&self) -> bool {
        self.og.is_empty() && self.twitter.is_empty()
    }
}

/// Page-level meta information shown on the overview tab
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub lang: Option<String>,
    pub charset: Option<String>,
    pub viewport: Option<String>,
    pub word_count: usize,
    pub headings: HeadingCounts,
    pub summary: PageSummary,
}
