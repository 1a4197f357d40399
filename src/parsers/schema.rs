use super::{selector, text};
use crate::results::{SchemaProperty, SchemaRecord};
use scraper::{ElementRef, Html};
use serde_json::Value;

/// Attributes that carry a Microdata property value, checked in order before text content
const VALUE_ATTRIBUTES: [&str; 4] = ["content", "href", "src", "datetime"];

/// Extracts all structured-data blocks: JSON-LD scripts first, then Microdata items
pub fn extract(doc: &Html) -> Vec<SchemaRecord> {
    let mut records = extract_json_ld(doc);
    records.extend(extract_microdata(doc));
    ::log::debug!("Schema extractor found {} blocks", records.len());
    records
}

/// Parses every `application/ld+json` script; a top-level array yields one record per item
pub fn extract_json_ld(doc: &Html) -> Vec<SchemaRecord> {
    let mut records = Vec::new();

    for script in doc.select(&selector("script[type]")) {
        let is_json_ld = script
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_json_ld {
            continue;
        }

        let raw = script.text().collect::<String>();
        let value = match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => value,
            Err(e) => {
                ::log::warn!("Skipping invalid JSON-LD block: {}", e);
                continue;
            }
        };

        match value {
            Value::Array(items) => records.extend(items.into_iter().map(json_ld_record)),
            other => records.push(json_ld_record(other)),
        }
    }

    records
}

fn json_ld_record(content: Value) -> SchemaRecord {
    SchemaRecord {
        schema_type: declared_type(&content),
        content: Some(content),
        properties: None,
    }
}

/// Reads `@type`, joining array forms with ", "
fn declared_type(value: &Value) -> Option<String> {
    match value.get("@type")? {
        Value::String(t) => Some(t.clone()),
        Value::Array(types) => {
            let joined = types
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

/// Extracts every typed `itemscope`, nested ones included, in document order
pub fn extract_microdata(doc: &Html) -> Vec<SchemaRecord> {
    doc.select(&selector("[itemscope][itemtype]"))
        .map(|scope| SchemaRecord {
            schema_type: scope.value().attr("itemtype").and_then(type_from_itemtype),
            content: None,
            properties: Some(item_properties(&scope)),
        })
        .collect()
}

/// "https://schema.org/AggregateRating" -> "AggregateRating"
fn type_from_itemtype(itemtype: &str) -> Option<String> {
    let first = itemtype.split_whitespace().next()?;
    let name = first.trim_end_matches('/').rsplit('/').next()?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Properties that belong directly to `scope`, not to an item nested inside it
fn item_properties(scope: &ElementRef) -> Vec<SchemaProperty> {
    scope
        .select(&selector("[itemprop]"))
        .filter(|prop| owning_scope(prop).is_some_and(|owner| owner.id() == scope.id()))
        .filter_map(|prop| {
            let name = prop.value().attr("itemprop")?.trim().to_string();
            Some(SchemaProperty {
                name,
                value: property_value(&prop),
            })
        })
        .collect()
}

fn owning_scope<'a>(prop: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    prop.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().attr("itemscope").is_some())
}

fn property_value(prop: &ElementRef) -> String {
    let value = prop.value();
    if value.attr("itemscope").is_some() {
        // A nested item; it is reported as its own record
        return value
            .attr("itemtype")
            .and_then(type_from_itemtype)
            .unwrap_or_default();
    }

    VALUE_ATTRIBUTES
        .iter()
        .find_map(|attr| value.attr(attr))
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| text::element_text(prop))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_itemtype() {
        assert_eq!(
            type_from_itemtype("https://schema.org/AggregateRating"),
            Some("AggregateRating".to_string())
        );
        assert_eq!(
            type_from_itemtype("http://schema.org/Product/ http://x"),
            Some("Product".to_string())
        );
        assert_eq!(type_from_itemtype("  "), None);
    }

    #[test]
    fn test_declared_type_array() {
        let value: Value = serde_json::json!({"@type": ["Organization", "LocalBusiness"]});
        assert_eq!(
            declared_type(&value),
            Some("Organization, LocalBusiness".to_string())
        );
        assert_eq!(declared_type(&serde_json::json!({"name": "x"})), None);
    }
}
