use super::{ExportAction, RenderContext, RenderedTab, Tab, TabWriter, truncate};
use crate::error::Result;
use crate::export::{Download, ExportFormat};
use crate::results::SchemaRecord;
use crate::schema::{SchemaGroup, format, group_schemas};

const KEY_WIDTH: usize = 28;

pub fn render(schemas: &[SchemaRecord], ctx: &RenderContext) -> Result<RenderedTab> {
    let groups = group_schemas(schemas);
    let mut out = TabWriter::default();

    out.field(
        Some("schema-groups"),
        "Schemas",
        format!("{} blocks, {} groups", schemas.len(), groups.len()),
    );

    if groups.is_empty() {
        out.blank();
        out.line("No structured data found on this page.");
    }
    for group in &groups {
        out.blank();
        table(&mut out, group);
    }

    Ok(out.finish(Tab::Schema, exports(&groups, ctx)?))
}

fn table(out: &mut TabWriter, group: &SchemaGroup) {
    if group.count > 1 {
        out.line(format!("== {} (x{}) ==", group.type_name(), group.count));
    } else {
        out.line(format!("== {} ==", group.type_name()));
    }

    let rows = group.rows();
    if rows.is_empty() {
        out.line("  (no properties)");
    }
    for row in rows {
        out.line(format!(
            "  {:<width$} {}",
            truncate(&row.key, KEY_WIDTH),
            truncate(&row.value, 80),
            width = KEY_WIDTH
        ));
    }
}

fn exports(groups: &[SchemaGroup], ctx: &RenderContext) -> Result<Vec<ExportAction>> {
    if groups.is_empty() {
        return Ok(vec![
            ExportAction::new("export-schema-text", "Export schema (text)", None),
            ExportAction::new("export-schema-json", "Export schema (JSON)", None),
            ExportAction::new("export-schema-html", "Export schema (HTML table)", None),
        ]);
    }

    Ok(vec![
        ExportAction::new(
            "export-schema-text",
            "Export schema (text)",
            Some(Download::new(
                &ctx.page_url,
                "schema",
                ExportFormat::Text,
                format::to_text(groups),
            )),
        ),
        ExportAction::new(
            "export-schema-json",
            "Export schema (JSON)",
            Some(Download::new(
                &ctx.page_url,
                "schema",
                ExportFormat::Json,
                format::to_json(groups)?,
            )),
        ),
        ExportAction::new(
            "export-schema-html",
            "Export schema (HTML table)",
            Some(Download::new(
                &ctx.page_url,
                "schema",
                ExportFormat::Html,
                format::to_table_html(groups),
            )),
        ),
    ])
}
