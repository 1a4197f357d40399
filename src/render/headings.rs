use super::{ExportAction, RenderContext, RenderedTab, Tab, TabWriter, truncate};
use crate::error::Result;
use crate::export::{Download, ExportFormat, to_json};
use crate::messaging::HeadingsResponse;

pub fn render(headings: &HeadingsResponse, ctx: &RenderContext) -> Result<RenderedTab> {
    let mut out = TabWriter::default();
    let counts = &headings.counts;

    out.field(Some("headings-h1"), "H1", counts.h1.to_string());
    for level in 2..=6 {
        out.field(None, &format!("H{level}"), counts.get(level).to_string());
    }
    out.field(None, "Links", headings.summary.total_links.to_string());
    out.field(None, "Images", headings.summary.total_images.to_string());
    out.blank();

    if headings.structure.is_empty() {
        out.line("No headings found on this page.");
    } else {
        out.field(
            Some("headings-structure"),
            "Structure",
            format!("{} headings", headings.structure.len()),
        );
        for heading in &headings.structure {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            let nav = if heading.is_navigation { " [nav]" } else { "" };
            let text = if heading.text.is_empty() {
                "(empty)".to_string()
            } else {
                truncate(&heading.text, 80)
            };
            out.line(format!("{indent}H{} {text}{nav}", heading.level));
        }
    }

    let exports = if headings.structure.is_empty() {
        vec![
            ExportAction::new("export-headings-csv", "Export headings (CSV)", None),
            ExportAction::new("export-headings-json", "Export headings (JSON)", None),
        ]
    } else {
        vec![
            ExportAction::new(
                "export-headings-csv",
                "Export headings (CSV)",
                Some(Download::new(
                    &ctx.page_url,
                    "headings",
                    ExportFormat::Csv,
                    ctx.csv.write(&headings.structure)?,
                )),
            ),
            ExportAction::new(
                "export-headings-json",
                "Export headings (JSON)",
                Some(Download::new(
                    &ctx.page_url,
                    "headings",
                    ExportFormat::Json,
                    to_json(&headings.structure)?,
                )),
            ),
        ]
    };

    Ok(out.finish(Tab::Headings, exports))
}
