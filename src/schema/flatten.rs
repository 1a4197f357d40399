use crate::results::SchemaRecord;
use serde::Serialize;
use serde_json::{Map, Value};

/// One flattened property: a dotted/bracketed path and its display value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRow {
    pub key: String,
    pub value: String,
}

impl PropertyRow {
    fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Flattens a JSON value into `{key, value}` rows.
///
/// Paths use `parent.child` for object fields and `field[i]` for array
/// elements, e.g. `@graph[0].name` or `offers[1].price`. Rules:
///
/// - strings, numbers and booleans are emitted under their full path; nulls are dropped
/// - arrays of objects expand each element under an `[i]` segment
/// - arrays of scalars and empty arrays are dropped
/// - nested objects are recursed, except objects with an `@id`, which become a
///   single reference row holding the `@id`
pub fn extract_properties(value: &Value, prefix: &str) -> Vec<PropertyRow> {
    let mut rows = Vec::new();
    match value {
        Value::Object(map) => flatten_object(map, prefix, &mut rows),
        other => flatten_value(other, prefix, &mut rows),
    }
    rows
}

/// Flattened rows for a record, sorted by key.
///
/// JSON-LD records flatten their content; Microdata records use their
/// property list as-is.
pub fn flatten_record(record: &SchemaRecord) -> Vec<PropertyRow> {
    let mut rows = match (&record.content, &record.properties) {
        (Some(content), _) => extract_properties(content, ""),
        (None, Some(properties)) => properties
            .iter()
            .map(|p| PropertyRow::new(p.name.as_str(), p.value.as_str()))
            .collect(),
        (None, None) => Vec::new(),
    };
    // Stable, so repeated Microdata names keep their document order
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

fn flatten_object(map: &Map<String, Value>, prefix: &str, rows: &mut Vec<PropertyRow>) {
    for (field, value) in map {
        let path = join_path(prefix, field);
        match value {
            Value::Object(nested) => match nested.get("@id") {
                Some(id) => rows.push(PropertyRow::new(path, scalar_text(id))),
                None => flatten_object(nested, &path, rows),
            },
            other => flatten_value(other, &path, rows),
        }
    }
}

fn flatten_value(value: &Value, path: &str, rows: &mut Vec<PropertyRow>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                // Elements are expanded even when they carry an @id (e.g. @graph entries)
                if let Value::Object(element) = item {
                    flatten_object(element, &format!("{path}[{i}]"), rows);
                }
            }
        }
        Value::Object(map) => flatten_object(map, path, rows),
        scalar => {
            let key = if path.is_empty() { "value" } else { path };
            rows.push(PropertyRow::new(key, scalar_text(scalar)));
        }
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(rows: &[PropertyRow]) -> Vec<&str> {
        rows.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn test_scalars_at_any_depth() {
        let rows = extract_properties(
            &json!({
                "name": "Acme",
                "founded": 1999,
                "active": true,
                "address": {"city": "Gent", "geo": {"lat": 51.05}},
                "fax": null
            }),
            "",
        );
        let mut pairs = rows
            .iter()
            .map(|r| (r.key.as_str(), r.value.as_str()))
            .collect::<Vec<_>>();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("active", "true"),
                ("address.city", "Gent"),
                ("address.geo.lat", "51.05"),
                ("founded", "1999"),
                ("name", "Acme"),
            ]
        );
    }

    #[test]
    fn test_graph_elements_are_indexed() {
        let rows = extract_properties(
            &json!({
                "@context": "https://schema.org",
                "@graph": [
                    {"@id": "#org", "@type": "Organization", "name": "Acme"},
                    {"@type": "WebSite", "publisher": {"@id": "#org"}}
                ]
            }),
            "",
        );
        let mut k = keys(&rows);
        k.sort();
        assert_eq!(
            k,
            vec![
                "@context",
                "@graph[0].@id",
                "@graph[0].@type",
                "@graph[0].name",
                "@graph[1].@type",
                "@graph[1].publisher",
            ]
        );
        let publisher = rows.iter().find(|r| r.key == "@graph[1].publisher").unwrap();
        assert_eq!(publisher.value, "#org");
    }

    #[test]
    fn test_scalar_and_empty_arrays_are_dropped() {
        let rows = extract_properties(
            &json!({"sameAs": ["https://a", "https://b"], "images": [], "name": "x"}),
            "",
        );
        assert_eq!(keys(&rows), vec!["name"]);
    }

    #[test]
    fn test_nested_arrays_of_objects() {
        let rows = extract_properties(
            &json!({"offers": [{"price": "10", "seller": {"name": "S"}}, {"price": "12"}]}),
            "",
        );
        let mut k = keys(&rows);
        k.sort();
        assert_eq!(
            k,
            vec!["offers[0].price", "offers[0].seller.name", "offers[1].price"]
        );
    }

    #[test]
    fn test_prefix_and_non_object_root() {
        let rows = extract_properties(&json!({"a": 1}), "root");
        assert_eq!(keys(&rows), vec!["root.a"]);

        let rows = extract_properties(&json!("plain"), "");
        assert_eq!(rows, vec![PropertyRow::new("value", "plain")]);
    }

    #[test]
    fn test_flatten_record_sorts_keys() {
        let record = SchemaRecord {
            schema_type: Some("Thing".into()),
            content: Some(json!({"zeta": "1", "alpha": "2", "@type": "Thing"})),
            properties: None,
        };
        assert_eq!(keys(&flatten_record(&record)), vec!["@type", "alpha", "zeta"]);
    }
}
