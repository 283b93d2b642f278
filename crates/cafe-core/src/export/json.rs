//! Structured (JSON) encoder.
//!
//! Nesting, key order and array order are preserved. Output is pretty-printed
//! with two-space indentation; non-ASCII text is written as-is.

use crate::error::{CoreError, CoreResult};
use crate::record::Record;

/// Encodes records as a pretty-printed JSON array.
pub fn encode(records: &[Record]) -> CoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(records).map_err(|e| CoreError::encode("json", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Field, Value};

    fn menu_records() -> Vec<Record> {
        vec![
            [
                ("id", Value::from(1_i64)),
                ("title", Value::from("Tea")),
                ("price", Value::from(100_i64)),
            ]
            .into_iter()
            .collect(),
            [
                ("id", Value::from(2_i64)),
                ("title", Value::from("Coffee")),
                ("price", Value::from(150_i64)),
            ]
            .into_iter()
            .collect(),
        ]
    }

    #[test]
    fn test_flat_records() {
        let bytes = encode(&menu_records()).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let rows = doc.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], "Tea");
        assert_eq!(rows[1]["price"], 150);
    }

    #[test]
    fn test_two_space_indent_and_unescaped_text() {
        let record: Record = [("title", Value::from("Чай"))].into_iter().collect();
        let text = String::from_utf8(encode(&[record]).unwrap()).unwrap();

        assert_eq!(text, "[\n  {\n    \"title\": \"Чай\"\n  }\n]");
    }

    #[test]
    fn test_empty_is_empty_array() {
        assert_eq!(encode(&[]).unwrap(), b"[]");
    }

    #[test]
    fn test_round_trip_preserves_nesting() {
        let status: Record = [
            ("table_number", Value::from(3_i64)),
            ("status", Value::from("occupied")),
            ("last_updated", Value::Null),
        ]
        .into_iter()
        .collect();
        let items = vec![
            [("menu_id", 1_i64), ("quantity", 2_i64)].into_iter().collect::<Record>(),
            [("menu_id", 2_i64), ("quantity", 1_i64)].into_iter().collect::<Record>(),
        ];

        let mut order: Record = [("id", Value::from(7_i64)), ("ratio", Value::from(0.25))]
            .into_iter()
            .collect();
        order.insert("table_status", status);
        order.insert("order_items", items);

        let records = vec![order];
        let decoded: Vec<Record> = serde_json::from_slice(&encode(&records).unwrap()).unwrap();

        assert_eq!(decoded, records);
        assert!(matches!(decoded[0].get("table_status"), Some(Field::Nested(_))));
    }

    #[test]
    fn test_blob_decodes_as_text() {
        let record: Record = [("raw", Value::Blob(vec![0xde, 0xad]))].into_iter().collect();
        let decoded: Vec<Record> = serde_json::from_slice(&encode(&[record]).unwrap()).unwrap();

        assert_eq!(
            decoded[0].get("raw"),
            Some(&Field::Scalar(Value::Text("x'dead'".to_string())))
        );
    }
}
