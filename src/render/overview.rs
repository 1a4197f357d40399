use super::{ExportAction, RenderContext, RenderedTab, Tab, TabWriter, or_missing};
use crate::error::Result;
use crate::export::{Download, ExportFormat, to_json};
use crate::results::Overview;

pub fn render(overview: &Overview, ctx: &RenderContext) -> Result<RenderedTab> {
    let mut out = TabWriter::default();

    out.field(None, "URL", &overview.url);
    out.field(
        Some("overview-title"),
        "Title",
        with_length(&overview.title),
    );
    out.field(
        Some("overview-description"),
        "Description",
        with_length(&overview.description),
    );
    out.field(None, "Keywords", or_missing(&overview.keywords));
    out.field(
        Some("overview-canonical"),
        "Canonical",
        or_missing(&overview.canonical),
    );
    out.field(Some("overview-robots"), "Robots", or_missing(&overview.robots));
    out.field(Some("overview-lang"), "Language", or_missing(&overview.lang));
    out.field(None, "Charset", or_missing(&overview.charset));
    out.field(None, "Viewport", or_missing(&overview.viewport));
    out.blank();
    out.field(None, "Words", overview.word_count.to_string());
    out.field(None, "Links", overview.summary.total_links.to_string());
    out.field(None, "Images", overview.summary.total_images.to_string());
    out.field(
        None,
        "Headings",
        (1..=6)
            .map(|level| format!("H{level}: {}", overview.headings.get(level)))
            .collect::<Vec<_>>()
            .join("  "),
    );

    let json = Download::new(
        &ctx.page_url,
        "overview",
        ExportFormat::Json,
        to_json(overview)?,
    );
    let exports = vec![ExportAction::new(
        "export-overview-json",
        "Export overview (JSON)",
        Some(json),
    )];

    Ok(out.finish(Tab::Overview, exports))
}

fn with_length(value: &Option<String>) -> String {
    match value.as_deref().filter(|v| !v.is_empty()) {
        Some(v) => format!("{v} ({} chars)", v.chars().count()),
        None => "(missing)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::CsvExporter;

    #[test]
    fn test_overview_fields() {
        let overview = Overview {
            url: "https://acme.example/".into(),
            title: Some("Acme".into()),
            description: None,
            word_count: 42,
            ..Overview::default()
        };
        let ctx = RenderContext::new("https://acme.example/", CsvExporter::default());
        let tab = render(&overview, &ctx).unwrap();

        assert!(tab.body.contains("Title:         Acme (4 chars)\n"));
        assert!(tab.body.contains("Description:   (missing)\n"));
        assert!(tab.body.contains("Words:         42\n"));
        assert!(tab.body.contains("H1: 0  H2: 0"));
        assert_eq!(
            tab.export("export-overview-json")
                .and_then(|e| e.download.as_ref())
                .map(|d| d.filename.as_str()),
            Some("acme_overview.json")
        );
        assert_eq!(tab.anchors[0].element_id, "overview-title");
        assert_eq!(tab.anchors[0].line, 1);
    }
}
