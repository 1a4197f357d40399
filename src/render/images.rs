use super::{ExportAction, RenderContext, RenderedTab, Tab, TabWriter, truncate};
use crate::error::Result;
use crate::export::{Download, ExportFormat, ImageFilter, to_json};
use crate::results::ImageRecord;

pub fn render(images: &[ImageRecord], ctx: &RenderContext) -> Result<RenderedTab> {
    let mut out = TabWriter::default();
    let missing = ImageFilter::MissingAlt.apply(images);

    out.field(None, "Images", images.len().to_string());
    out.field(
        Some("images-missing-alt"),
        "Missing alt",
        missing.len().to_string(),
    );
    out.field(
        None,
        "Hidden",
        images.iter().filter(|i| !i.is_visible).count().to_string(),
    );
    out.blank();

    for image in images {
        let alt = if image.is_missing_alt() {
            "[no alt]".to_string()
        } else {
            format!("alt=\"{}\"", truncate(&image.alt, 40))
        };
        let size = if image.width > 0 || image.height > 0 {
            format!(" {}x{}", image.width, image.height)
        } else {
            String::new()
        };
        let hidden = if image.is_visible { "" } else { " (hidden)" };
        out.line(format!("{} {alt}{size}{hidden}", truncate(&image.src, 70)));
    }

    let exports = vec![
        csv_action(ctx, images, ImageFilter::All, "export-images-csv", "Export all images (CSV)")?,
        csv_action(
            ctx,
            images,
            ImageFilter::MissingAlt,
            "export-missing-alt-csv",
            "Export images missing alt (CSV)",
        )?,
        csv_action(
            ctx,
            images,
            ImageFilter::WithAlt,
            "export-with-alt-csv",
            "Export images with alt (CSV)",
        )?,
        ExportAction::new(
            "export-images-json",
            "Export all images (JSON)",
            if images.is_empty() {
                None
            } else {
                Some(Download::new(
                    &ctx.page_url,
                    ImageFilter::All.kind(),
                    ExportFormat::Json,
                    to_json(images)?,
                ))
            },
        ),
    ];

    Ok(out.finish(Tab::Images, exports))
}

fn csv_action(
    ctx: &RenderContext,
    images: &[ImageRecord],
    filter: ImageFilter,
    id: &'static str,
    label: &'static str,
) -> Result<ExportAction> {
    let selected = filter.apply(images);
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
    Ok(ExportAction::new(id, label, download))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::CsvExporter;

    fn image(src: &str, alt: &str) -> ImageRecord {
        ImageRecord {
            src: src.to_string(),
            alt: alt.to_string(),
            title: "x".to_string(),
            width: 10,
            height: 20,
            is_visible: true,
        }
    }

    #[test]
    fn test_missing_alt_export() {
        let images = vec![image("a.png", ""), image("b.png", "Bee")];
        let ctx = RenderContext::new("https://www.acme.example/", CsvExporter::default());
        let tab = render(&images, &ctx).unwrap();

        assert!(tab.body.contains("Missing alt:   1\n"));
        assert!(tab.body.contains("a.png [no alt] 10x20\n"));
        assert!(tab.body.contains("b.png alt=\"Bee\" 10x20\n"));

        let download = tab
            .export("export-missing-alt-csv")
            .and_then(|e| e.download.as_ref())
            .unwrap();
        assert_eq!(download.filename, "acme_images_missing_alt.csv");
        assert_eq!(
            download.contents,
            "Source;Alt;Title;Width;Height\na.png;;x;10;20\n"
        );
    }

    #[test]
    fn test_no_images_disables_all_exports() {
        let ctx = RenderContext::new("https://acme.example/", CsvExporter::default());
        let tab = render(&[], &ctx).unwrap();
        assert_eq!(tab.exports.len(), 4);
        assert!(tab.exports.iter().all(|e| !e.is_enabled()));
    }
}
