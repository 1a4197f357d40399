//! Request/response channel between the popup session and the page context.
//!
//! The page context ("content script") runs as its own task and owns the page
//! source. Each request is answered by re-parsing that source, so every
//! answer reflects a fresh scan rather than cached state.

use crate::error::{InspectError, Result};
use crate::fetchers::FetchedPage;
use crate::filter::LinkClassifier;
use crate::parsers::PageDocument;
use crate::results::{
    HeadingCounts, HeadingRecord, ImageRecord, LinkMetrics, LinkRecord, Overview, PageSummary,
    SchemaRecord, SocialMetadata,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};

/// Requests understood by the content script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetLinks,
    GetHeadings,
    GetImages,
    HighlightImagesWithNoAlt { highlight: bool },
    GetSitemapInfo,
    GetOverview,
    GetSocial,
    GetSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinksResponse {
    pub links: Vec<LinkRecord>,
    pub metrics: LinkMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingsResponse {
    pub counts: HeadingCounts,
    pub structure: Vec<HeadingRecord>,
    pub summary: PageSummary,
}

/// Answers from the content script, one variant per request kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Links(LinksResponse),
    Headings(HeadingsResponse),
    Images { images: Vec<ImageRecord> },
    Highlight { highlighted: usize },
    SitemapInfo { links: Vec<String> },
    Overview(Overview),
    Social(SocialMetadata),
    Schema { schemas: Vec<SchemaRecord> },
}

/// The page-side handler
pub struct ContentScript {
    url: String,
    source: String,
    classifier: LinkClassifier,
    highlight_missing_alt: bool,
}

impl ContentScript {
    pub fn new(page: FetchedPage, classifier: LinkClassifier) -> Self {
        Self {
            url: page.url,
            source: page.html,
            classifier,
            highlight_missing_alt: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether images without alt text are currently flagged
    #[cfg(test)]
    fn is_highlighting(&self) -> bool {
        self.highlight_missing_alt
    }

    /// Scans the page and answers one request
    pub fn handle(&mut self, request: &Request) -> Response {
        let page = PageDocument::parse(&self.url, &self.source);

        match request {
            Request::GetLinks => {
                let (links, metrics) = page.link_metrics(&self.classifier);
                Response::Links(LinksResponse { links, metrics })
            }
            Request::GetHeadings => {
                let (counts, structure) = page.headings();
                Response::Headings(HeadingsResponse {
                    counts,
                    structure,
                    summary: page.summary(),
                })
            }
            Request::GetImages => Response::Images {
                images: page.images(),
            },
            Request::HighlightImagesWithNoAlt { highlight } => {
                self.highlight_missing_alt = *highlight;
                let highlighted = if self.highlight_missing_alt {
                    page.images().iter().filter(|i| i.is_missing_alt()).count()
                } else {
                    0
                };
                ::log::debug!(
                    "Highlight of images without alt {}: {} images",
                    if *highlight { "on" } else { "off" },
                    highlighted
                );
                Response::Highlight { highlighted }
            }
            Request::GetSitemapInfo => Response::SitemapInfo {
                links: page.sitemap_links(),
            },
            Request::GetOverview => Response::Overview(page.overview()),
            Request::GetSocial => Response::Social(page.social()),
            Request::GetSchema => Response::Schema {
                schemas: page.schemas(),
            },
        }
    }
}

/// A response tagged with the sequence number of the request it answers
#[derive(Debug)]
pub struct Reply {
    pub seq: u64,
    pub response: Response,
}

struct Envelope {
    seq: u64,
    request: Request,
    reply: oneshot::Sender<Reply>,
}

/// Popup-side handle for talking to a content script task
#[derive(Clone)]
pub struct PageChannel {
    tx: mpsc::Sender<Envelope>,
}

impl PageChannel {
    /// Spawns the content script task; it stops once every channel handle is dropped
    pub fn spawn(mut script: ContentScript) -> Self {
        let (tx, mut rx) = mpsc::channel::<Envelope>(16);

        tokio::spawn(async move {
            ::log::debug!("Content script started for {}", script.url());
            while let Some(envelope) = rx.recv().await {
                ::log::trace!("Content script handling #{}: {:?}", envelope.seq, envelope.request);
                let response = script.handle(&envelope.request);
                if envelope
                    .reply
                    .send(Reply {
                        seq: envelope.seq,
                        response,
                    })
                    .is_err()
                {
                    ::log::debug!("Requester for #{} went away", envelope.seq);
                }
            }
            ::log::debug!("Content script for {} stopped", script.url());
        });

        Self { tx }
    }

    /// Sends one request and waits for its reply
    pub async fn send(&self, seq: u64, request: Request) -> Result<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                seq,
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| InspectError::Channel("receiving end does not exist".to_string()))?;

        reply_rx
            .await
            .map_err(|_| InspectError::Channel("content script dropped the request".to_string()))
    }
}

/// Numbers requests so that only the answer to the most recent one is used
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }
}
