use super::SchemaGroup;
use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

/// One entry of the JSON schema export
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaExportEntry {
    schema_type: String,
    /// 1-based position of the group on the page
    schema_index: usize,
    data: Map<String, Value>,
}

/// Plain-text export: `**key**` / value blocks per schema, schemas separated by `---`
pub fn to_text(groups: &[SchemaGroup]) -> String {
    groups
        .iter()
        .map(|group| {
            group
                .rows()
                .iter()
                .map(|row| format!("**{}**\n{}\n\n", row.key, row.value))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("---\n\n")
}

/// JSON export: an array of `{schemaType, schemaIndex, data}` objects, pretty-printed
pub fn to_json(groups: &[SchemaGroup]) -> Result<String> {
    let entries = groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let mut data = Map::new();
            for row in group.rows() {
                match data.get_mut(&row.key) {
                    // Repeated Microdata names are joined rather than overwritten
                    Some(Value::String(existing)) => {
                        existing.push_str(", ");
                        existing.push_str(&row.value);
                    }
                    _ => {
                        data.insert(row.key, Value::String(row.value));
                    }
                }
            }
            SchemaExportEntry {
                schema_type: group.type_name().to_string(),
                schema_index: i + 1,
                data,
            }
        })
        .collect::<Vec<_>>();

    Ok(serde_json::to_string_pretty(&entries)?)
}

/// HTML table per schema group: key-sorted rows, alternating `even`/`odd`
/// classes, URL values rendered as links
pub fn to_table_html(groups: &[SchemaGroup]) -> String {
    let mut html = String::new();

    for group in groups {
        let caption = if group.count > 1 {
            format!("{} (x{})", group.type_name(), group.count)
        } else {
            group.type_name().to_string()
        };

        html.push_str("<table class=\"schema-table\">\n");
        html.push_str(&format!("<caption>{}</caption>\n", escape_html(&caption)));
        html.push_str("<thead><tr><th>Property</th><th>Value</th></tr></thead>\n<tbody>\n");

        for (i, row) in group.rows().iter().enumerate() {
            let class = if i % 2 == 0 { "even" } else { "odd" };
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td></tr>\n",
                class,
                escape_html(&row.key),
                value_cell(&row.value)
            ));
        }

        html.push_str("</tbody>\n</table>\n");
    }

    html
}

/// True for absolute http(s) URLs
pub fn is_url(value: &str) -> bool {
    (value.starts_with("http://") || value.starts_with("https://")) && Url::parse(value).is_ok()
}

fn value_cell(value: &str) -> String {
    let escaped = escape_html(value);
    if is_url(value) {
        format!("<a href=\"{escaped}\" target=\"_blank\" rel=\"noopener\">{escaped}</a>")
    } else {
        escaped
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{SchemaProperty, SchemaRecord};
    use serde_json::json;

    fn group(content: Value, count: usize) -> SchemaGroup {
        SchemaGroup {
            record: SchemaRecord {
                schema_type: content["@type"].as_str().map(String::from),
                content: Some(content),
                properties: None,
            },
            count,
        }
    }

    #[test]
    fn test_text_blocks_and_separator() {
        let groups = vec![
            group(json!({"@type": "A", "name": "x"}), 1),
            group(json!({"@type": "B"}), 1),
        ];
        assert_eq!(
            to_text(&groups),
            "**@type**\nA\n\n**name**\nx\n\n---\n\n**@type**\nB\n\n"
        );
    }

    #[test]
    fn test_json_shape() {
        let groups = vec![group(json!({"@type": "Organization", "name": "Acme"}), 1)];
        let parsed: Value = serde_json::from_str(&to_json(&groups).unwrap()).unwrap();
        assert_eq!(
            parsed,
            json!([{
                "schemaType": "Organization",
                "schemaIndex": 1,
                "data": {"@type": "Organization", "name": "Acme"}
            }])
        );
    }

    #[test]
    fn test_json_joins_repeated_microdata_names() {
        let groups = vec![SchemaGroup {
            record: SchemaRecord {
                schema_type: Some("Recipe".into()),
                content: None,
                properties: Some(vec![
                    SchemaProperty {
                        name: "ingredient".into(),
                        value: "flour".into(),
                    },
                    SchemaProperty {
                        name: "ingredient".into(),
                        value: "sugar".into(),
                    },
                ]),
            },
            count: 1,
        }];
        let parsed: Value = serde_json::from_str(&to_json(&groups).unwrap()).unwrap();
        assert_eq!(parsed[0]["data"]["ingredient"], "flour, sugar");
    }

    #[test]
    fn test_table_rows_links_and_escaping() {
        let groups = vec![group(
            json!({"@type": "WebPage", "url": "https://example.com/?a=1&b=2", "name": "<b>Hi</b>"}),
            2,
        )];
        let html = to_table_html(&groups);

        assert!(html.contains("<caption>WebPage (x2)</caption>"));
        assert!(html.contains(
            "<tr class=\"even\"><td>@type</td><td>WebPage</td></tr>\n\
             <tr class=\"odd\"><td>name</td><td>&lt;b&gt;Hi&lt;/b&gt;</td></tr>\n"
        ));
        assert!(html.contains(
            "<a href=\"https://example.com/?a=1&amp;b=2\" target=\"_blank\" rel=\"noopener\">"
        ));
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com"));
        assert!(!is_url("example.com"));
        assert!(!is_url("http://"));
    }
}
