//! Result rendering.
//!
//! BSON values without a JSON counterpart (ObjectId, DateTime, Decimal128,
//! Timestamp, Binary, ...) are rendered as strings.

use bson::{Bson, Document};
use serde_json::{Map, Number, Value};

use common::errors::AppResult;

/// Converts a BSON value to display JSON.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Double(d) => Number::from_f64(*d)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(d.to_string())),
        Bson::String(s) | Bson::Symbol(s) | Bson::JavaScriptCode(s) => Value::String(s.clone()),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        ),
        Bson::Decimal128(d) => Value::String(d.to_string()),
        other => Value::String(other.to_string()),
    }
}

/// Converts a whole document.
pub fn document_to_json(doc: &Document) -> Value {
    Value::Object(
        doc.iter()
            .map(|(key, value)| (key.clone(), bson_to_json(value)))
            .collect::<Map<String, Value>>(),
    )
}

/// `Found N documents in collection '<name>':` followed by a pretty listing.
pub fn render_listing(collection: &str, documents: &[Document]) -> AppResult<String> {
    let listing: Vec<Value> = documents.iter().map(document_to_json).collect();
    Ok(format!(
        "Found {} documents in collection '{}':\n\n{}",
        documents.len(),
        collection,
        serde_json::to_string_pretty(&listing)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId, DateTime};
    use serde_json::json;

    #[test]
    fn test_object_id_and_date_become_strings() {
        let oid = ObjectId::parse_str("65f1a2b3c4d5e6f708192a3b").unwrap();
        let created = DateTime::from_millis(0);
        let value = document_to_json(&doc! { "_id": oid, "createdAt": created, "n": 3 });

        assert_eq!(value["_id"], json!("65f1a2b3c4d5e6f708192a3b"));
        assert_eq!(value["createdAt"], json!("1970-01-01T00:00:00Z"));
        assert_eq!(value["n"], json!(3));
    }

    #[test]
    fn test_nested_values() {
        let value = document_to_json(&doc! {
            "tags": ["a", "b"],
            "meta": { "active": true, "score": 1.5 },
            "missing": Bson::Null,
        });
        assert_eq!(
            value,
            json!({
                "tags": ["a", "b"],
                "meta": { "active": true, "score": 1.5 },
                "missing": null
            })
        );
    }

    #[test]
    fn test_non_finite_double_is_string() {
        assert_eq!(bson_to_json(&Bson::Double(f64::NAN)), json!("NaN"));
    }

    #[test]
    fn test_listing_header() {
        let text = render_listing("mycollection", &[doc! { "name": "Sample" }]).unwrap();
        assert!(text.starts_with("Found 1 documents in collection 'mycollection':\n\n"));
        assert!(text.contains("\"name\": \"Sample\""));
    }

    #[test]
    fn test_empty_listing() {
        let text = render_listing("empty", &[]).unwrap();
        assert_eq!(text, "Found 0 documents in collection 'empty':\n\n[]");
    }
}
