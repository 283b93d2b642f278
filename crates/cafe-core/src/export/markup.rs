//! Hierarchical-markup (XML) encoder.
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <orders>                         root = table name
//!   <record>                       one per record
//!     <id>7</id>                   scalar leaf
//!     <note/>                      null / empty leaf
//!     <table_status>               nested record
//!       <status>occupied</status>
//!     </table_status>
//!     <order_items>                list wrapper
//!       <item>...</item>           one per element
//!     </order_items>
//!   </record>
//! </orders>
//! ```

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{CoreError, CoreResult};
use crate::record::{Field, Record};

const RECORD_ELEMENT: &str = "record";
const ITEM_ELEMENT: &str = "item";
const REPLACEMENT: char = '\u{FFFD}';

/// Encodes records as an indented UTF-8 XML document.
pub fn encode(table: &str, records: &[Record]) -> CoreResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let root = element_name(table);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;
    emit(&mut writer, Event::Start(BytesStart::new(root.as_str())))?;

    for record in records {
        write_element(&mut writer, RECORD_ELEMENT, record)?;
    }

    emit(&mut writer, Event::End(BytesEnd::new(root.as_str())))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Turns an arbitrary key into a valid XML element name.
///
/// Characters outside the name alphabet become `_`; a name that would start
/// with a digit, `-` or `.` gets a leading `_`.
pub fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match name.chars().next() {
        None => name.push('_'),
        Some(first) if !(first.is_alphabetic() || first == '_') => name.insert(0, '_'),
        Some(_) => {}
    }

    name
}

/// Replaces characters XML 1.0 does not allow in text with U+FFFD.
///
/// Tab, LF and CR are kept; the rest of U+0000-U+001F and the
/// noncharacters U+FFFE and U+FFFF are replaced.
pub fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .map(|c| if is_xml_char(c) { c } else { REPLACEMENT })
            .collect(),
    )
}

#[inline]
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, record: &Record) -> CoreResult<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    write_fields(writer, record)?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn write_fields(writer: &mut Writer<Vec<u8>>, record: &Record) -> CoreResult<()> {
    for (key, field) in record.iter() {
        let name = element_name(key);
        match field {
            Field::Scalar(value) => {
                let text = value.to_string();
                if text.is_empty() {
                    emit(writer, Event::Empty(BytesStart::new(name.as_str())))?;
                } else {
                    emit(writer, Event::Start(BytesStart::new(name.as_str())))?;
                    emit(writer, Event::Text(BytesText::new(&xml_text(&text))))?;
                    emit(writer, Event::End(BytesEnd::new(name.as_str())))?;
                }
            }
            Field::Nested(related) => write_element(writer, &name, related)?,
            Field::List(related) => {
                emit(writer, Event::Start(BytesStart::new(name.as_str())))?;
                for item in related {
                    write_element(writer, ITEM_ELEMENT, item)?;
                }
                emit(writer, Event::End(BytesEnd::new(name.as_str())))?;
            }
        }
    }
    Ok(())
}

#[inline]
fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> CoreResult<()> {
    writer
        .write_event(event)
        .map_err(|e| CoreError::encode("xml", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn to_text(table: &str, records: &[Record]) -> String {
        String::from_utf8(encode(table, records).unwrap()).unwrap()
    }

    #[test]
    fn test_flat_records() {
        let records: Vec<Record> = vec![
            [("id", Value::from(1_i64)), ("title", Value::from("Tea")), ("price", Value::from(100_i64))]
                .into_iter()
                .collect(),
            [("id", Value::from(2_i64)), ("title", Value::from("Coffee")), ("price", Value::from(150_i64))]
                .into_iter()
                .collect(),
        ];

        let xml = to_text("menu", &records);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<menu>\n"));
        assert!(xml.ends_with("</menu>\n"));
        assert_eq!(xml.matches("<record>").count(), 2);
        assert!(xml.contains("<title>Tea</title>"));
        assert!(xml.contains("<price>150</price>"));
    }

    #[test]
    fn test_empty_root() {
        assert_eq!(
            to_text("menu", &[]),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<menu>\n</menu>\n"
        );
    }

    #[test]
    fn test_nested_and_list() {
        let status: Record = [("status", "occupied")].into_iter().collect();
        let items = vec![
            [("menu_id", 1_i64)].into_iter().collect::<Record>(),
            [("menu_id", 2_i64)].into_iter().collect::<Record>(),
        ];
        let mut order: Record = [("id", Value::from(7_i64)), ("note", Value::Null)]
            .into_iter()
            .collect();
        order.insert("table_status", status);
        order.insert("order_items", items);

        let xml = to_text("orders", &[order]);

        assert!(xml.contains("<note/>"));
        assert!(xml.contains("<table_status>\n      <status>occupied</status>\n    </table_status>"));
        assert_eq!(xml.matches("<item>").count(), 2);
        assert!(xml.contains("<menu_id>2</menu_id>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let record: Record = [("title", "Fish & <Chips>")].into_iter().collect();
        let xml = to_text("menu", &[record]);
        assert!(xml.contains("<title>Fish &amp; &lt;Chips&gt;</title>"));
    }

    #[test]
    fn test_control_characters_replaced() {
        let record: Record = [("note", "a\u{1}b\u{0}"), ("memo", "tab\there\r\nnext")]
            .into_iter()
            .collect();

        let xml = to_text("orders", &[record]);

        assert!(xml.contains("<note>a\u{FFFD}b\u{FFFD}</note>"));
        assert!(!xml.contains('\u{1}'));
        assert!(!xml.contains('\u{0}'));
        assert!(xml.contains("tab\there"));
    }

    #[test]
    fn test_xml_text_borrows_clean_input() {
        assert!(matches!(xml_text("plain"), Cow::Borrowed("plain")));
        assert_eq!(xml_text("\u{1F}x\u{FFFF}"), "\u{FFFD}x\u{FFFD}");
    }

    #[test]
    fn test_element_name_sanitized() {
        assert_eq!(element_name("order_items"), "order_items");
        assert_eq!(element_name("блюдо"), "блюдо");
        assert_eq!(element_name("unit price"), "unit_price");
        assert_eq!(element_name("2024"), "_2024");
        assert_eq!(element_name(""), "_");
    }
}
