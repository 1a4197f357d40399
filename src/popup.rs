//! The popup side of an inspection: one session per inspected page.
//!
//! Every tab switch sends a fresh request to the content script and renders
//! whatever comes back. Answers to requests that have since been superseded are
//! dropped.

use crate::config::InspectorConfig;
use crate::error::{InspectError, Result};
use crate::export::CsvExporter;
use crate::fetchers::FetchedPage;
use crate::filter::LinkClassifier;
use crate::messaging::{ContentScript, PageChannel, Request, RequestSequencer, Response};
use crate::render::{FieldAnchor, RenderContext, RenderedTab, Tab};
use crate::sitemap::{FooterLinks, SitemapResolver};
use crate::tooltip::{Rect, TooltipEvent, TooltipManager, TooltipStyle, Viewport, help_text, topic_for};
use std::time::Instant;

/// Shown in place of a tab whose data could not be loaded
pub const LOAD_ERROR: &str = "Error loading data";

/// Size of one character cell on the popup surface
const CELL_WIDTH: f64 = 8.0;
const LINE_HEIGHT: f64 = 18.0;

const POPUP: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};
const TOOLTIP_WIDTH: f64 = 260.0;
const TOOLTIP_HEIGHT: f64 = 72.0;
/// Cells a button adds around its label
const BUTTON_PADDING: usize = 4;
/// Binding-table entry for export buttons with nothing to export
const DISABLED_EXPORT: &str = "export-disabled";

pub struct PopupSession {
    channel: PageChannel,
    /// Numbers tab loads; only the latest one may land
    tab_sequencer: RequestSequencer,
    /// Numbers highlight and sitemap requests, which never supersede a tab load
    action_sequencer: RequestSequencer,
    tooltips: TooltipManager,
    /// Explanations on disabled export buttons
    button_tooltips: TooltipManager,
    context: RenderContext,
    resolver: SitemapResolver,
}

impl PopupSession {
    /// Spawns the content script for `page` and connects a session to it.
    /// Must be called inside a tokio runtime.
    pub fn open(page: FetchedPage, config: &InspectorConfig) -> Result<Self> {
        let context = RenderContext::new(&page.url, CsvExporter::new(config.csv_delimiter)?);
        let classifier = LinkClassifier::new(config.external_domains.clone());
        let channel = PageChannel::spawn(ContentScript::new(page, classifier));

        Ok(Self {
            channel,
            tab_sequencer: RequestSequencer::default(),
            action_sequencer: RequestSequencer::default(),
            tooltips: TooltipManager::new(TooltipStyle::info(), POPUP),
            button_tooltips: TooltipManager::new(TooltipStyle::disabled_button(), POPUP),
            context,
            resolver: SitemapResolver::new(config)?,
        })
    }

    pub fn page_url(&self) -> &str {
        &self.context.page_url
    }

    /// Sends a request that is not tied to the active tab
    async fn request(&self, request: Request) -> Result<Response> {
        let reply = self
            .channel
            .send(self.action_sequencer.next(), request)
            .await?;
        Ok(reply.response)
    }

    /// Queries the page for `tab` and renders the answer. Fails with
    /// `StaleResponse` when another tab load was started in the meantime.
    pub async fn load_tab(&self, tab: Tab) -> Result<RenderedTab> {
        let seq = self.tab_sequencer.next();
        let reply = self.channel.send(seq, tab.request()).await?;
        if !self.tab_sequencer.is_current(reply.seq) {
            ::log::debug!("Dropping stale {} response #{}", tab.title(), reply.seq);
            return Err(InspectError::StaleResponse(reply.seq));
        }
        tab.render(&reply.response, &self.context)
    }

    /// Loads and renders a tab, falling back to an error body, and attaches
    /// help tooltips to the rendered fields
    pub async fn show_tab(&mut self, tab: Tab) -> RenderedTab {
        match self.load_tab(tab).await {
            Ok(rendered) => {
                self.bind_tooltips(&rendered.anchors);
                self.bind_button_tooltips(&rendered);
                rendered
            }
            Err(e) => {
                ::log::error!("Failed to load {} tab: {}", tab.title(), e);
                RenderedTab {
                    tab,
                    body: format!("{LOAD_ERROR}\n"),
                    exports: Vec::new(),
                    anchors: Vec::new(),
                }
            }
        }
    }

    /// Turns the missing-alt highlight on or off; returns how many images are flagged
    pub async fn highlight_missing_alt(&self, highlight: bool) -> Result<usize> {
        match self
            .request(Request::HighlightImagesWithNoAlt { highlight })
            .await?
        {
            Response::Highlight { highlighted } => Ok(highlighted),
            other => Err(InspectError::Channel(format!(
                "unexpected highlight response: {other:?}"
            ))),
        }
    }

    /// Robots and sitemap links for the footer; `None` for pages without an http(s) origin
    pub async fn footer(&self) -> Option<FooterLinks> {
        let domain = crate::utils::display_domain(self.page_url())?;
        let page_links = async {
            match self.request(Request::GetSitemapInfo).await {
                Ok(Response::SitemapInfo { links }) => links,
                Ok(other) => {
                    ::log::warn!("Unexpected sitemap info response: {:?}", other);
                    Vec::new()
                }
                Err(e) => {
                    ::log::warn!("Could not read sitemap links from page: {}", e);
                    Vec::new()
                }
            }
        };
        Some(self.resolver.footer_links(&domain, page_links).await)
    }

    /// Help texts of the fields shown so far, as `(element id, text)`
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.tooltips
            .bound_topics()
            .into_iter()
            .filter_map(|(id, topic)| help_text(topic).map(|text| (id.to_string(), text)))
            .collect()
    }

    /// Forwards a pointer or keyboard event to the tooltips
    pub fn tooltip_event(&mut self, element_id: &str, event: TooltipEvent, now: Instant) {
        self.tooltips.handle(element_id, event, now);
        self.tooltips.tick(now);
    }

    /// Forwards a pointer or keyboard event to the disabled-button explanations
    pub fn button_event(&mut self, action_id: &str, event: TooltipEvent, now: Instant) {
        self.button_tooltips.handle(action_id, event, now);
        self.button_tooltips.tick(now);
    }

    pub fn tooltips(&self) -> &TooltipManager {
        &self.tooltips
    }

    pub fn button_tooltips(&self) -> &TooltipManager {
        &self.button_tooltips
    }

    fn bind_tooltips(&mut self, anchors: &[FieldAnchor]) {
        for anchor in anchors {
            let Some(topic) = topic_for(anchor.element_id) else {
                ::log::debug!("No help topic for {}", anchor.element_id);
                continue;
            };
            // Info icon sits one cell after the label
            let icon = Rect::new(
                (anchor.column + anchor.width + 1) as f64 * CELL_WIDTH,
                anchor.line as f64 * LINE_HEIGHT,
                CELL_WIDTH,
                LINE_HEIGHT,
            );
            if self
                .tooltips
                .bind(anchor.element_id, topic, icon, TOOLTIP_WIDTH, TOOLTIP_HEIGHT)
            {
                ::log::trace!("Bound tooltip {} -> {}", anchor.element_id, topic);
            }
        }
    }

    /// Export buttons sit on one row under the tab body; the disabled ones get
    /// an explanation above them
    fn bind_button_tooltips(&mut self, rendered: &RenderedTab) {
        let Some(topic) = topic_for(DISABLED_EXPORT) else {
            return;
        };
        let row = (rendered.body.lines().count() + 1) as f64 * LINE_HEIGHT;
        let mut column = 0;

        for action in &rendered.exports {
            let width = action.label.chars().count() + BUTTON_PADDING;
            if !action.is_enabled() {
                let button = Rect::new(
                    column as f64 * CELL_WIDTH,
                    row,
                    width as f64 * CELL_WIDTH,
                    LINE_HEIGHT,
                );
                if self
                    .button_tooltips
                    .bind(action.id, topic, button, TOOLTIP_WIDTH, TOOLTIP_HEIGHT)
                {
                    ::log::trace!("Bound disabled-export explanation to {}", action.id);
                }
            }
            column += width + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tooltip::Side;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html lang="en"><head><title>Acme</title></head><body>
        <h1>Acme</h1>
        <img src="a.png"><img src="b.png" alt="Bee">
        <a href="/about">About</a>
        <a href="https://twitter.com/acme">Twitter</a>
        </body></html>"#;

    fn session(url: &str, html: &str) -> PopupSession {
        PopupSession::open(
            FetchedPage {
                url: url.to_string(),
                html: html.to_string(),
            },
            &InspectorConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_show_tab_binds_tooltips_once() {
        let mut popup = session("https://acme.example/", PAGE);

        let tab = popup.show_tab(Tab::Overview).await;
        assert!(tab.body.contains("Title:         Acme (4 chars)"));
        assert!(popup.tooltips().is_bound("overview-title"));

        // Showing the tab again re-queries the page without rebinding
        let again = popup.show_tab(Tab::Overview).await;
        assert_eq!(again.body, tab.body);
        let titles = popup
            .help_entries()
            .into_iter()
            .filter(|(id, _)| id == "overview-title")
            .count();
        assert_eq!(titles, 1);
    }

    #[tokio::test]
    async fn test_links_tab_through_channel() {
        let popup = session("https://acme.example/", PAGE);
        let tab = popup.load_tab(Tab::Links).await.unwrap();
        assert!(tab.body.contains("Internal:      1\n"));
        assert!(tab.body.contains("External:      1\n"));
    }

    #[tokio::test]
    async fn test_superseded_request_is_dropped() {
        let popup = session("https://acme.example/", PAGE);
        let (first, second) = tokio::join!(popup.load_tab(Tab::Images), popup.load_tab(Tab::Links));
        assert!(matches!(first, Err(InspectError::StaleResponse(1))));
        assert_eq!(second.unwrap().tab, Tab::Links);
    }

    #[tokio::test]
    async fn test_highlight_does_not_supersede_tab_load() {
        let popup = session("https://acme.example/", PAGE);
        let (tab, highlighted) = tokio::join!(
            popup.load_tab(Tab::Images),
            popup.highlight_missing_alt(true)
        );
        assert_eq!(tab.unwrap().tab, Tab::Images);
        assert_eq!(highlighted.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_footer_lookup_does_not_supersede_tab_load() {
        let popup = session("https://acme.example/", PAGE);
        let (tab, links) = tokio::join!(
            popup.load_tab(Tab::Links),
            popup.request(Request::GetSitemapInfo)
        );
        assert_eq!(tab.unwrap().tab, Tab::Links);
        assert!(matches!(links, Ok(Response::SitemapInfo { .. })));
    }

    #[tokio::test]
    async fn test_disabled_export_explained_above_button() {
        let mut popup = session(
            "https://acme.example/",
            r#"<img src="b.png" alt="Bee">"#,
        );
        let tab = popup.show_tab(Tab::Images).await;
        assert!(!tab.export("export-missing-alt-csv").unwrap().is_enabled());

        assert!(popup.button_tooltips().is_bound("export-missing-alt-csv"));
        assert!(!popup.button_tooltips().is_bound("export-with-alt-csv"));

        let now = Instant::now();
        popup.button_event("export-missing-alt-csv", TooltipEvent::IconEnter, now);
        let placement = popup
            .button_tooltips()
            .placement("export-missing-alt-csv")
            .unwrap();
        assert_eq!(placement.side, Side::Top);
        assert_eq!(placement.arrow.class(), "arrow-down");
        assert_eq!(
            popup.button_tooltips().bound_topics(),
            vec![("export-missing-alt-csv", "export-disabled")]
        );

        // Still shown during the grace delay, gone after Escape
        popup.button_event("export-missing-alt-csv", TooltipEvent::IconLeave, now);
        assert!(popup.button_tooltips().is_visible("export-missing-alt-csv"));
        popup.button_event("export-missing-alt-csv", TooltipEvent::Escape, now);
        assert!(!popup.button_tooltips().is_visible("export-missing-alt-csv"));
    }

    #[tokio::test]
    async fn test_highlight_counts_missing_alt() {
        let popup = session("https://acme.example/", PAGE);
        assert_eq!(popup.highlight_missing_alt(true).await.unwrap(), 1);
        assert_eq!(popup.highlight_missing_alt(false).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_tooltip_opens_left_of_icon() {
        let mut popup = session("https://acme.example/", PAGE);
        popup.show_tab(Tab::Images).await;

        let now = Instant::now();
        popup.tooltip_event("images-missing-alt", TooltipEvent::IconEnter, now);
        assert!(popup.tooltips().is_visible("images-missing-alt"));

        popup.tooltip_event("images-missing-alt", TooltipEvent::Escape, now);
        assert!(!popup.tooltips().is_visible("images-missing-alt"));
    }

    #[tokio::test]
    async fn test_footer_uses_sitemap_linked_from_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/maps/site.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let html = r#"<link rel="sitemap" href="/maps/site.xml"><h1>Hi</h1>"#;
        let popup = session(&format!("{}/", server.uri()), html);
        let footer = popup.footer().await.unwrap();

        assert_eq!(footer.robots_url, format!("{}/robots.txt", server.uri()));
        assert_eq!(footer.sitemap_url, format!("{}/maps/site.xml", server.uri()));
    }

    #[tokio::test]
    async fn test_no_footer_for_local_files() {
        let popup = session("file:///tmp/page.html", PAGE);
        assert!(popup.footer().await.is_none());
    }
}
