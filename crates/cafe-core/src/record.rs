//! # Assembled Records
//!
//! Runtime-shaped rows used by the export pipeline.
//!
//! The set of tables is only known at runtime, so rows are not mapped onto
//! per-table structs. Instead every row becomes a [`Record`]: an
//! insertion-ordered map from column name to a [`Field`].
//!
//! ```text
//! Record (orders #7)
//! ├── id            Scalar(Integer 7)
//! ├── table_number  Scalar(Integer 3)
//! ├── status        Scalar(Text "active")
//! └── table_status  Nested(Record)          ← exactly one related row
//!     ├── table_number  Scalar(Integer 3)
//!     └── status        Scalar(Text "occupied")
//!
//! Record (orders #8)
//! └── order_items   List([Record, Record])  ← two or more related rows
//! ```

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

// =============================================================================
// Scalar Value
// =============================================================================

/// A single column value, typed by its SQLite storage class.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns `true` for SQL NULL.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Display form used wherever a value must become plain text
/// (CSV cells, XML leaves, text dump, joined lists).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(v) => write!(f, "{v}"),
            // `{:?}` keeps the `.0` of whole reals, as JSON does
            Value::Real(v) => write!(f, "{v:?}"),
            Value::Text(v) => f.write_str(v),
            Value::Blob(bytes) => {
                f.write_str("x'")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str("'")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

// =============================================================================
// Field
// =============================================================================

/// The value stored under one key of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// A plain column value.
    Scalar(Value),
    /// Exactly one related row.
    Nested(Record),
    /// Two or more related rows, in store order.
    List(Vec<Record>),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Scalar(value) => value.fmt(f),
            Field::Nested(record) => record.fmt(f),
            Field::List(records) => {
                f.write_str("[")?;
                for (i, record) in records.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    record.fmt(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Field::Scalar(value)
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Field::Scalar(Value::Integer(v))
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Field::Scalar(Value::Text(v.to_string()))
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Field::Scalar(Value::Text(v))
    }
}

impl From<Record> for Field {
    fn from(record: Record) -> Self {
        Field::Nested(record)
    }
}

impl From<Vec<Record>> for Field {
    fn from(records: Vec<Record>) -> Self {
        Field::List(records)
    }
}

// =============================================================================
// Record
// =============================================================================

/// An insertion-ordered map from key to [`Field`].
///
/// Inserting an existing key replaces its value in place, keeping the
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Field)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Zips column names with row values positionally.
    ///
    /// Extra values or extra columns are ignored (the shorter side wins).
    pub fn from_row<I>(columns: &[String], values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut record = Record {
            fields: Vec::with_capacity(columns.len()),
        };
        for (column, value) in columns.iter().zip(values) {
            record.insert(column.clone(), Field::Scalar(value));
        }
        record
    }

    /// Inserts a field, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, field: impl Into<Field>) -> Option<Field> {
        let key = key.into();
        let field = field.into();

        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, field)),
            None => {
                self.fields.push((key, field));
                None
            }
        }
    }

    /// Looks up a field by key.
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, field)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {field}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, F: Into<Field>> FromIterator<(K, F)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, F)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (key, field) in iter {
            record.insert(key, field);
        }
        record
    }
}

// =============================================================================
// Serde: Serialize
// =============================================================================

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Real(v) if v.is_finite() => serializer.serialize_f64(*v),
            // NaN/inf and blobs have no JSON form; fall back to display text
            other => serializer.collect_str(other),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Scalar(value) => value.serialize(serializer),
            Field::Nested(record) => record.serialize(serializer),
            Field::List(records) => {
                let mut seq = serializer.serialize_seq(Some(records.len()))?;
                for record in records {
                    seq.serialize_element(record)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, field) in &self.fields {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

// =============================================================================
// Serde: Deserialize
// =============================================================================
// Decoding keeps document key order. Numbers come back as Integer/Real,
// strings as Text (blobs were written as text and stay text).

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        while let Some((key, field)) = map.next_entry::<String, Field>()? {
            record.insert(key, field);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct FieldVisitor;

impl<'de> Visitor<'de> for FieldVisitor {
    type Value = Field;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, a record object or an array of record objects")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Field, E> {
        Ok(Field::Scalar(Value::Integer(i64::from(v))))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Field, E> {
        Ok(Field::Scalar(Value::Integer(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Field, E> {
        Ok(Field::Scalar(match i64::try_from(v) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Real(v as f64),
        }))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Field, E> {
        Ok(Field::Scalar(Value::Real(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Field, E> {
        Ok(Field::Scalar(Value::Text(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Field, E> {
        Ok(Field::Scalar(Value::Text(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Field, E> {
        Ok(Field::Scalar(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Field, E> {
        Ok(Field::Scalar(Value::Null))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Field, A::Error> {
        RecordVisitor.visit_map(map).map(Field::Nested)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Field, A::Error> {
        let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(record) = seq.next_element::<Record>()? {
            records.push(record);
        }
        Ok(Field::List(records))
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_row_zips_positionally() {
        let record = Record::from_row(
            &columns(&["id", "title", "price"]),
            vec![Value::from(1_i64), Value::from("Tea"), Value::from(100_i64)],
        );

        assert_eq!(record.keys().collect::<Vec<_>>(), ["id", "title", "price"]);
        assert_eq!(record.get("title"), Some(&Field::Scalar(Value::from("Tea"))));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record: Record = [("a", 1_i64), ("b", 2_i64)].into_iter().collect();
        let previous = record.insert("a", Record::new());

        assert_eq!(previous, Some(Field::Scalar(Value::Integer(1))));
        assert_eq!(record.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert!(matches!(record.get("a"), Some(Field::Nested(_))));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
        assert_eq!(Value::Real(100.0).to_string(), "100.0");
        assert_eq!(Value::Blob(vec![0x0a, 0xff]).to_string(), "x'0aff'");

        let inner: Record = [("id", Value::from(1_i64)), ("title", Value::from("Tea"))]
            .into_iter()
            .collect();
        assert_eq!(inner.to_string(), "{id: 1, title: Tea}");

        let list = Field::List(vec![inner.clone(), inner]);
        assert_eq!(list.to_string(), "[{id: 1, title: Tea}, {id: 1, title: Tea}]");
    }

    #[test]
    fn test_serialize_keeps_key_order() {
        let record: Record = [("z", 1_i64), ("a", 2_i64)].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_serialize_non_representable_as_text() {
        let record: Record = [
            ("blob", Value::Blob(vec![1, 2])),
            ("nan", Value::Real(f64::NAN)),
            ("none", Value::Null),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"blob":"x'0102'","nan":"NaN","none":null}"#);
    }

    #[test]
    fn test_deserialize_nested_shapes() {
        let json = r#"{"id": 1, "price": 1.5, "t": {"n": null}, "l": [{"x": "y"}, {"x": "z"}]}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.keys().collect::<Vec<_>>(), ["id", "price", "t", "l"]);
        assert_eq!(record.get("price"), Some(&Field::Scalar(Value::Real(1.5))));
        match record.get("l") {
            Some(Field::List(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {other:?}"),
        }
    }
}
