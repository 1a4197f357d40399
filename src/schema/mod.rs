//! Grouping, flattening and formatting of extracted structured data.

pub mod flatten;
pub mod format;

pub use flatten::{PropertyRow, extract_properties, flatten_record};

use crate::results::SchemaRecord;

/// A structured-data block together with how many identical copies the page carries
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaGroup {
    pub record: SchemaRecord,
    pub count: usize,
}

impl SchemaGroup {
    pub fn type_name(&self) -> &str {
        self.record.type_name()
    }

    /// Flattened, key-sorted rows of the grouped record
    pub fn rows(&self) -> Vec<PropertyRow> {
        flatten_record(&self.record)
    }
}

/// Collapses identical rating blocks.
///
/// Records whose type contains "Rating" and that carry Microdata properties are
/// compared by their serialized property list; every later record with the
/// same serialization is folded into the first one and counted. All other
/// records stay as singleton groups. Output keeps first-occurrence order.
pub fn group_schemas(records: &[SchemaRecord]) -> Vec<SchemaGroup> {
    let keys = records.iter().map(rating_key).collect::<Vec<_>>();
    let mut consumed = vec![false; records.len()];
    let mut groups = Vec::new();

    for (i, record) in records.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;
        let mut count = 1;

        if let Some(key) = &keys[i] {
            for j in (i + 1)..records.len() {
                if !consumed[j] && keys[j].as_ref() == Some(key) {
                    consumed[j] = true;
                    count += 1;
                }
            }
        }

        groups.push(SchemaGroup {
            record: record.clone(),
            count,
        });
    }

    ::log::debug!(
        "Grouped {} schema blocks into {} groups",
        records.len(),
        groups.len()
    );
    groups
}

fn rating_key(record: &SchemaRecord) -> Option<String> {
    if !record.is_rating() {
        return None;
    }
    let properties = record.properties.as_ref()?;
    serde_json::to_string(properties).ok()
}
