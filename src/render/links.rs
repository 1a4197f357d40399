use super::{ExportAction, RenderContext, RenderedTab, Tab, TabWriter, truncate};
use crate::error::Result;
use crate::export::{Download, ExportFormat, LinkFilter, to_json};
use crate::messaging::LinksResponse;
use crate::results::LinkRecord;

const EXPORTS: [(LinkFilter, &str, &str); 4] = [
    (LinkFilter::All, "export-links-csv", "Export all links (CSV)"),
    (LinkFilter::Unique, "export-unique-links-csv", "Export unique links (CSV)"),
    (LinkFilter::Internal, "export-internal-links-csv", "Export internal links (CSV)"),
    (LinkFilter::External, "export-external-links-csv", "Export external links (CSV)"),
];

pub fn render(response: &LinksResponse, ctx: &RenderContext) -> Result<RenderedTab> {
    let mut out = TabWriter::default();
    let metrics = &response.metrics;

    out.field(None, "Total", metrics.total.to_string());
    out.field(Some("links-unique"), "Unique", metrics.unique.to_string());
    out.field(
        Some("links-internal"),
        "Internal",
        metrics.total_internal.to_string(),
    );
    out.field(
        Some("links-external"),
        "External",
        metrics.total_external.to_string(),
    );
    out.field(
        None,
        "Without text",
        response.links.iter().filter(|l| !l.has_text).count().to_string(),
    );
    out.blank();

    for link in &metrics.unique_links {
        out.line(describe(link));
    }

    let mut exports = Vec::with_capacity(EXPORTS.len() + 1);
    for (filter, id, label) in EXPORTS {
        let selected = filter.apply(&response.links);
        let download = if selected.is_empty() {
            None
        } else {
            Some(Download::new(
                &ctx.page_url,
                filter.kind(),
                ExportFormat::Csv,
                ctx.csv.write(&selected)?,
            ))
        };
        exports.push(ExportAction::new(id, label, download));
    }
    exports.push(ExportAction::new(
        "export-links-json",
        "Export link report (JSON)",
        if response.links.is_empty() {
            None
        } else {
            Some(Download::new(
                &ctx.page_url,
                "links",
                ExportFormat::Json,
                to_json(response)?,
            ))
        },
    ));

    Ok(out.finish(Tab::Links, exports))
}

fn describe(link: &LinkRecord) -> String {
    let kind = if link.is_internal { "int" } else { "ext" };
    let text = if link.has_text {
        truncate(&link.text, 40)
    } else {
        "(no text)".to_string()
    };
    format!("[{kind}] {} - {text}", truncate(&link.href, 70))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::CsvExporter;
    use crate::parsers::links::metrics;

    fn link(href: &str, text: &str, is_internal: bool) -> LinkRecord {
        LinkRecord {
            href: href.to_string(),
            text: text.to_string(),
            is_internal,
            has_text: !text.is_empty(),
        }
    }

    #[test]
    fn test_links_tab_lists_unique_links() {
        let links = vec![
            link("/a", "A", true),
            link("/a", "A again", true),
            link("tel:1", "", false),
        ];
        let response = LinksResponse {
            metrics: metrics(&links),
            links,
        };
        let ctx = RenderContext::new("https://acme.example/", CsvExporter::default());
        let tab = render(&response, &ctx).unwrap();

        assert!(tab.body.contains("Unique:        2\n"));
        assert!(tab.body.contains("[int] /a - A\n"));
        assert!(tab.body.contains("[ext] tel:1 - (no text)\n"));
        assert!(!tab.body.contains("A again"));

        let unique = tab
            .export("export-unique-links-csv")
            .and_then(|e| e.download.as_ref())
            .unwrap();
        assert_eq!(unique.filename, "acme_links_unique.csv");
        assert_eq!(unique.contents.lines().count(), 3);

        let json = tab
            .export("export-links-json")
            .and_then(|e| e.download.as_ref())
            .unwrap();
        assert!(json.contents.contains("\"totalExternal\": 1"));
    }

    #[test]
    fn test_no_external_links_disables_that_export() {
        let links = vec![link("/a", "A", true)];
        let response = LinksResponse {
            metrics: metrics(&links),
            links,
        };
        let ctx = RenderContext::new("https://acme.example/", CsvExporter::default());
        let tab = render(&response, &ctx).unwrap();
        assert!(!tab.export("export-external-links-csv").unwrap().is_enabled());
        assert!(tab.export("export-internal-links-csv").unwrap().is_enabled());
    }
}
