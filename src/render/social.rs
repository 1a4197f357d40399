use super::{ExportAction, RenderContext, RenderedTab, Tab, TabWriter, truncate};
use crate::error::Result;
use crate::export::{Download, ExportFormat, to_json};
use crate::results::SocialMetadata;
use std::collections::BTreeMap;

pub fn render(social: &SocialMetadata, ctx: &RenderContext) -> Result<RenderedTab> {
    let mut out = TabWriter::default();

    section(&mut out, "social-og", "Open Graph", "og", &social.og);
    out.blank();
    section(&mut out, "social-twitter", "Twitter", "twitter", &social.twitter);

    let download = if social.is_empty() {
        None
    } else {
        Some(Download::new(
            &ctx.page_url,
            "social",
            ExportFormat::Json,
            to_json(social)?,
        ))
    };
    let exports = vec![ExportAction::new(
        "export-social-json",
        "Export social tags (JSON)",
        download,
    )];

    Ok(out.finish(Tab::Social, exports))
}

fn section(
    out: &mut TabWriter,
    element_id: &'static str,
    label: &str,
    prefix: &str,
    tags: &BTreeMap<String, String>,
) {
    out.field(Some(element_id), label, format!("{} tags", tags.len()));
    if tags.is_empty() {
        out.line(format!("  No {prefix}: tags found."));
    }
    for (name, value) in tags {
        out.line(format!("  {prefix}:{name} = {}", truncate(value, 80)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::CsvExporter;

    #[test]
    fn test_lists_both_tag_families() {
        let mut social = SocialMetadata::default();
        social.og.insert("title".into(), "Acme".into());
        social.og.insert("image".into(), "https://acme.example/a.png".into());
        let ctx = RenderContext::new("https://acme.example/", CsvExporter::default());
        let tab = render(&social, &ctx).unwrap();

        assert!(tab.body.contains("Open Graph:    2 tags\n"));
        // BTreeMap keeps tags sorted by name
        assert!(tab.body.contains("  og:image = https://acme.example/a.png\n  og:title = Acme\n"));
        assert!(tab.body.contains("  No twitter: tags found.\n"));
        assert_eq!(
            tab.anchors.iter().map(|a| a.element_id).collect::<Vec<_>>(),
            vec!["social-og", "social-twitter"]
        );
        assert!(tab.export("export-social-json").unwrap().is_enabled());
    }

    #[test]
    fn test_empty_metadata_disables_export() {
        let ctx = RenderContext::new("https://acme.example/", CsvExporter::default());
        let tab = render(&SocialMetadata::default(), &ctx).unwrap();
        assert!(!tab.export("export-social-json").unwrap().is_enabled());
    }
}
