//! Tab renderers: each turns one content-script snapshot into the text of a
//! tab plus the export actions that tab offers.

pub mod headings;
pub mod images;
pub mod links;
pub mod overview;
pub mod schema;
pub mod social;

use crate::error::{InspectError, Result};
use crate::export::{CsvExporter, Download};
use crate::messaging::{Request, Response};

/// The tabs of the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Overview,
    Headings,
    Images,
    Links,
    Social,
    Schema,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Headings,
        Tab::Images,
        Tab::Links,
        Tab::Social,
        Tab::Schema,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Headings => "Headings",
            Tab::Images => "Images",
            Tab::Links => "Links",
            Tab::Social => "Social",
            Tab::Schema => "Schema",
        }
    }

    /// The content-script request that feeds this tab
    pub fn request(&self) -> Request {
        match self {
            Tab::Overview => Request::GetOverview,
            Tab::Headings => Request::GetHeadings,
            Tab::Images => Request::GetImages,
            Tab::Links => Request::GetLinks,
            Tab::Social => Request::GetSocial,
            Tab::Schema => Request::GetSchema,
        }
    }

    /// Renders the response to this tab's request
    pub fn render(&self, response: &Response, ctx: &RenderContext) -> Result<RenderedTab> {
        match (self, response) {
            (Tab::Overview, Response::Overview(overview)) => overview::render(overview, ctx),
            (Tab::Headings, Response::Headings(headings)) => headings::render(headings, ctx),
            (Tab::Images, Response::Images { images }) => images::render(images, ctx),
            (Tab::Links, Response::Links(links)) => links::render(links, ctx),
            (Tab::Social, Response::Social(social)) => social::render(social, ctx),
            (Tab::Schema, Response::Schema { schemas }) => schema::render(schemas, ctx),
            (tab, other) => Err(InspectError::Channel(format!(
                "{} tab received a mismatched response: {other:?}",
                tab.title()
            ))),
        }
    }
}

/// What renderers need besides the snapshot
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub page_url: String,
    pub csv: CsvExporter,
}

impl RenderContext {
    pub fn new(page_url: &str, csv: CsvExporter) -> Self {
        Self {
            page_url: page_url.to_string(),
            csv,
        }
    }
}

/// An export button; disabled when its filter matches nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportAction {
    pub id: &'static str,
    pub label: &'static str,
    pub download: Option<Download>,
}

impl ExportAction {
    pub fn new(id: &'static str, label: &'static str, download: Option<Download>) -> Self {
        Self {
            id,
            label,
            download,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.download.is_some()
    }
}

/// Position of a field that carries a help tooltip, in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAnchor {
    pub element_id: &'static str,
    pub line: usize,
    pub column: usize,
    pub width: usize,
}

/// A rendered tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTab {
    pub tab: Tab,
    pub body: String,
    pub exports: Vec<ExportAction>,
    pub anchors: Vec<FieldAnchor>,
}

impl RenderedTab {
    pub fn export(&self, id: &str) -> Option<&ExportAction> {
        self.exports.iter().find(|e| e.id == id)
    }
}

/// Line-oriented builder that remembers where help-carrying fields land
#[derive(Debug, Default)]
pub(crate) struct TabWriter {
    lines: Vec<String>,
    anchors: Vec<FieldAnchor>,
}

impl TabWriter {
    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// `label: value`, with a help anchor on the label when `element_id` is set
    pub fn field(&mut self, element_id: Option<&'static str>, label: &str, value: impl AsRef<str>) {
        if let Some(element_id) = element_id {
            self.anchors.push(FieldAnchor {
                element_id,
                line: self.lines.len(),
                column: 0,
                width: label.chars().count(),
            });
        }
        self.lines.push(format!("{:<14} {}", format!("{label}:"), value.as_ref()));
    }

    pub fn finish(self, tab: Tab, exports: Vec<ExportAction>) -> RenderedTab {
        let mut body = self.lines.join("\n");
        body.push('\n');
        RenderedTab {
            tab,
            body,
            exports,
            anchors: self.anchors,
        }
    }
}

/// Shortens long values for list display
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut short = text.chars().take(max.saturating_sub(1)).collect::<String>();
        short.push('…');
        short
    }
}

pub(crate) fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or("(missing)")
}
