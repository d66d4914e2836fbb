//! PDF object serialization.
//!
//! Turns [`Object`] values into the byte syntax of ISO 32000-1 §7.3.
//! Output is always compact and dictionary keys are sorted, so the same
//! object graph always produces the same bytes.

use std::collections::HashMap;

use crate::object::{Object, ObjectRef};

/// Serializer for PDF objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Serialize an object to bytes.
    pub fn serialize(obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        Self::write_object(&mut buf, obj);
        buf
    }

    /// Serialize an object to a string (for debugging and tests).
    pub fn serialize_to_string(obj: &Object) -> String {
        String::from_utf8_lossy(&Self::serialize(obj)).into_owned()
    }

    /// Append an object to a buffer.
    pub fn write_object(buf: &mut Vec<u8>, obj: &Object) {
        match obj {
            Object::Integer(i) => buf.extend_from_slice(i.to_string().as_bytes()),
            Object::Real(r) => buf.extend_from_slice(format_real(*r).as_bytes()),
            Object::String(s) => Self::write_string(buf, s),
            Object::Name(n) => Self::write_name(buf, n),
            Object::Array(arr) => {
                buf.push(b'[');
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        buf.push(b' ');
                    }
                    Self::write_object(buf, item);
                }
                buf.push(b']');
            },
            Object::Dictionary(dict) => Self::write_dictionary(buf, dict),
            Object::Reference(r) => buf.extend_from_slice(r.to_string().as_bytes()),
        }
    }

    /// Literal string `(...)` for printable ASCII, hex `<...>` otherwise.
    fn write_string(buf: &mut Vec<u8>, data: &[u8]) {
        let printable = data
            .iter()
            .all(|&b| matches!(b, b'\n' | b'\r' | b'\t') || (0x20..=0x7E).contains(&b));

        if printable {
            buf.push(b'(');
            for &byte in data {
                match byte {
                    b'(' | b')' | b'\\' => {
                        buf.push(b'\\');
                        buf.push(byte);
                    },
                    b'\n' => buf.extend_from_slice(b"\\n"),
                    b'\r' => buf.extend_from_slice(b"\\r"),
                    b'\t' => buf.extend_from_slice(b"\\t"),
                    _ => buf.push(byte),
                }
            }
            buf.push(b')');
        } else {
            buf.push(b'<');
            for byte in data {
                buf.extend_from_slice(format!("{:02X}", byte).as_bytes());
            }
            buf.push(b'>');
        }
    }

    /// Names escape delimiters, whitespace and non-ASCII bytes as `#xx`.
    fn write_name(buf: &mut Vec<u8>, name: &str) {
        buf.push(b'/');
        for byte in name.bytes() {
            let regular = (0x21..=0x7E).contains(&byte)
                && !matches!(byte, b'#' | b'/' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'%');
            if regular {
                buf.push(byte);
            } else {
                buf.extend_from_slice(format!("#{:02X}", byte).as_bytes());
            }
        }
    }

    fn write_dictionary(buf: &mut Vec<u8>, dict: &HashMap<String, Object>) {
        let mut keys: Vec<_> = dict.keys().collect();
        keys.sort();

        buf.extend_from_slice(b"<<");
        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                buf.push(b' ');
            }
            Self::write_name(buf, key);
            buf.push(b' ');
            Self::write_object(buf, &dict[key]);
        }
        buf.extend_from_slice(b">>");
    }
}

/// Format a real with at most 4 decimals and no trailing zeros.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{:.4}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Helper functions for building PDF objects.
impl ObjectSerializer {
    /// Create a Name object.
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    /// Create a String object from a Rust string.
    pub fn string(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec())
    }

    /// Create an Integer object.
    pub fn integer(i: i64) -> Object {
        Object::Integer(i)
    }

    /// Create a Real object.
    pub fn real(r: f64) -> Object {
        Object::Real(r)
    }

    /// Create an Array object.
    pub fn array(items: Vec<Object>) -> Object {
        Object::Array(items)
    }

    /// Create a Dictionary object.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Create a Reference object (generation 0).
    pub fn reference(id: u32) -> Object {
        Object::Reference(ObjectRef(id))
    }

    /// Create a rectangle array from corner coordinates.
    pub fn rect(llx: f64, lly: f64, urx: f64, ury: f64) -> Object {
        Object::Array(vec![
            Object::Real(llx),
            Object::Real(lly),
            Object::Real(urx),
            Object::Real(ury),
        ])
    }
}
