//! PDF object values.
//!
//! The writer never parses PDF, so this is only the subset of ISO 32000-1
//! §7.3 needed to assemble page trees, font graphs, resource dictionaries
//! and annotations before serializing them into indirect object bodies.
//! Stream objects are not modelled here: stream bodies are built directly
//! as bytes by [`ObjectWriter::stream_body`](crate::writer::ObjectWriter::stream_body).

use std::collections::HashMap;

/// A direct PDF value.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Integer number
    Integer(i64),
    /// Real number, written with at most 4 decimals
    Real(f64),
    /// String bytes, written literal or hex depending on content
    String(Vec<u8>),
    /// Name, without the leading `/`
    Name(String),
    /// Array
    Array(Vec<Object>),
    /// Dictionary; keys are written sorted
    Dictionary(HashMap<String, Object>),
    /// Indirect reference
    Reference(ObjectRef),
}

/// Reference to an indirect object. The writer only ever produces
/// generation 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub u32);

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} 0 R", self.0)
    }
}

impl Object {
    /// A text string for document metadata.
    ///
    /// ASCII goes out as is; anything else is UTF-16BE with a byte order
    /// mark, which every reader decodes regardless of PDFDocEncoding.
    pub fn text(value: &str) -> Object {
        if value.is_ascii() {
            return Object::String(value.as_bytes().to_vec());
        }
        let mut bytes = vec![0xFE, 0xFF];
        for unit in value.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_display() {
        assert_eq!(ObjectRef(12).to_string(), "12 0 R");
    }

    #[test]
    fn test_ascii_text_is_plain() {
        assert_eq!(Object::text("Report"), Object::String(b"Report".to_vec()));
    }

    #[test]
    fn test_unicode_text_is_utf16() {
        assert_eq!(
            Object::text("Café"),
            Object::String(vec![0xFE, 0xFF, 0x00, b'C', 0x00, b'a', 0x00, b'f', 0x00, 0xE9])
        );
    }
}
