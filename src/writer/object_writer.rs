//! Indirect object table and final PDF serialization.
//!
//! Object ids are handed out from 1 upward. A body can be set at any time
//! after allocation and may be replaced, which is how placeholders (the page
//! tree root, for one) get patched once their contents are known. At output
//! every allocated id must have a body.

use std::collections::BTreeMap;
use std::io::Write;

use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use crate::object::Object;

/// Binary marker line written after the header so transfer tools treat the
/// file as binary.
const BINARY_MARKER: &[u8] = b"%\xE2\xE3\xCF\xD3\n";

/// Allocates object ids, stores bodies and writes the final file.
#[derive(Debug, Clone)]
pub struct ObjectWriter {
    next_id: u32,
    bodies: BTreeMap<u32, Vec<u8>>,
    version: String,
}

impl Default for ObjectWriter {
    fn default() -> Self {
        Self::new("1.7")
    }
}

impl ObjectWriter {
    /// Create a writer emitting the given PDF version header.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            next_id: 1,
            bodies: BTreeMap::new(),
            version: version.into(),
        }
    }

    /// Allocate the next object id.
    pub fn new_object_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Highest id allocated so far (0 when none).
    pub fn max_id(&self) -> u32 {
        self.next_id - 1
    }

    /// Store or replace the body of an object.
    pub fn set_object(&mut self, id: u32, body: impl Into<Vec<u8>>) {
        self.bodies.insert(id, body.into());
    }

    /// Store an [`Object`] value as the body of `id`.
    pub fn set_value(&mut self, id: u32, value: &Object) {
        self.set_object(id, ObjectSerializer::serialize(value));
    }

    /// Allocate an id and store `body` under it.
    pub fn add_object(&mut self, body: impl Into<Vec<u8>>) -> u32 {
        let id = self.new_object_id();
        self.set_object(id, body);
        id
    }

    /// Allocate an id and store an [`Object`] value under it.
    pub fn add_value(&mut self, value: &Object) -> u32 {
        let id = self.new_object_id();
        self.set_value(id, value);
        id
    }

    /// Body stored for `id`, if any.
    pub fn object(&self, id: u32) -> Option<&[u8]> {
        self.bodies.get(&id).map(Vec::as_slice)
    }

    /// Wrap a payload as a stream body.
    ///
    /// With no dictionary the result is `<< /Length n >>`. A supplied
    /// dictionary (`<< ... >>` text) gets `/Length n` spliced in before its
    /// closing delimiter.
    pub fn stream_body(dict: Option<&str>, data: &[u8]) -> Vec<u8> {
        let length = format!("/Length {}", data.len());
        let dict = match dict.map(str::trim) {
            Some(d) if d.ends_with(">>") => {
                let inner = d[..d.len() - 2].trim_end();
                format!("{} {} >>", inner, length)
            },
            _ => format!("<< {} >>", length),
        };

        let mut body = Vec::with_capacity(dict.len() + data.len() + 20);
        body.extend_from_slice(dict.as_bytes());
        body.extend_from_slice(b"\nstream\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        body
    }

    /// Like [`stream_body`](Self::stream_body), optionally Flate-compressing
    /// the payload and adding `/Filter /FlateDecode`.
    ///
    /// Falls back to the uncompressed payload if the encoder fails.
    pub fn encoded_stream_body(dict: Option<&str>, data: &[u8], compress: bool) -> Vec<u8> {
        if !compress {
            return Self::stream_body(dict, data);
        }
        match compress_data(data) {
            Ok(compressed) => {
                let dict = match dict.map(str::trim) {
                    Some(d) if d.ends_with(">>") => {
                        format!("{} /Filter /FlateDecode >>", d[..d.len() - 2].trim_end())
                    },
                    _ => "<< /Filter /FlateDecode >>".to_string(),
                };
                Self::stream_body(Some(&dict), &compressed)
            },
            Err(e) => {
                log::warn!("Stream compression failed, writing uncompressed: {}", e);
                Self::stream_body(dict, data)
            },
        }
    }

    /// Serialize header, every object, the xref table and the trailer.
    ///
    /// Fails with [`Error::MissingObject`] if any allocated id lacks a body.
    pub fn output(&self, catalog_id: u32, info_id: Option<u32>) -> Result<Vec<u8>> {
        let max_id = self.max_id();
        let mut out = Vec::new();
        writeln!(out, "%PDF-{}", self.version)?;
        out.extend_from_slice(BINARY_MARKER);

        let mut offsets = Vec::with_capacity(max_id as usize);
        for id in 1..=max_id {
            let body = self.bodies.get(&id).ok_or(Error::MissingObject(id))?;
            offsets.push(out.len());
            writeln!(out, "{} 0 obj", id)?;
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_start = out.len();
        writeln!(out, "xref")?;
        writeln!(out, "0 {}", max_id + 1)?;
        // Each entry is exactly 20 bytes including the two-byte EOL
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            write!(out, "{:010} 00000 n \n", offset)?;
        }

        writeln!(out, "trailer")?;
        write!(out, "<< /Size {} /Root {} 0 R", max_id + 1, catalog_id)?;
        if let Some(info) = info_id {
            write!(out, " /Info {} 0 R", info)?;
        }
        writeln!(out, " >>")?;
        writeln!(out, "startxref")?;
        writeln!(out, "{}", xref_start)?;
        writeln!(out, "%%EOF")?;

        log::debug!("Serialized {} objects, {} bytes", max_id, out.len());
        Ok(out)
    }
}

/// Zlib-compress a stream payload for `/FlateDecode`.
pub fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
