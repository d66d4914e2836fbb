//! TrueType font parser for PDF embedding.
//!
//! Reads the table directory and the handful of tables needed to lay out
//! text and embed the font as a CIDFontType2:
//!
//! - `head`: units per em, global bounding box
//! - `hhea` / `maxp` / `hmtx`: ascent, descent, glyph count, advance widths
//! - `cmap`: Unicode -> glyph mapping (see [`super::cmap`])
//! - `name`: PostScript and family names
//! - `post`: italic angle (optional)
//!
//! Everything except `post` is required; a missing table fails the parse.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;

use super::byte_reader::ByteReader;
use super::cmap::parse_cmap_table;

/// Fonts shorter than this cannot hold a table directory plus required tables.
pub const MIN_FONT_SIZE: usize = 100;

/// Error types for TrueType font parsing.
#[derive(Debug, thiserror::Error)]
pub enum TrueTypeError {
    /// Font file is empty
    #[error("Font file is empty")]
    EmptyFont,

    /// Font file is too short to be a font
    #[error("Font file is implausibly small ({0} bytes)")]
    TooSmall(usize),

    /// Not a TrueType table directory
    #[error("Unrecognized font header: 0x{0:08X}")]
    BadHeader(u32),

    /// Required table is missing
    #[error("Required font table is missing: {0}")]
    MissingTable(String),

    /// A read ran past the end of the font data
    #[error("Unexpected end of font data at byte {offset}")]
    UnexpectedEof {
        /// Offset of the failed read
        offset: usize,
    },

    /// No usable Unicode cmap subtable
    #[error("No Windows Unicode cmap subtable (format 4 or 12) found")]
    UnsupportedCmap,
}

/// Result type for TrueType operations.
pub type TrueTypeResult<T> = Result<T, TrueTypeError>;

/// Table directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    /// Byte offset of the table from the start of the file
    pub offset: u32,
    /// Table length in bytes
    pub length: u32,
}

/// Everything the layout engine and PDF emitter need from a font.
///
/// Immutable once parsed.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    /// Design units per em (never below 16)
    pub units_per_em: u16,
    /// Typographic ascent in font units
    pub ascent: i16,
    /// Typographic descent in font units (negative)
    pub descent: i16,
    /// Line gap in font units
    pub line_gap: i16,
    /// Global bounding box (xMin, yMin, xMax, yMax)
    pub bbox: [i16; 4],
    /// Advance width per glyph id, in font units
    pub advances: Vec<u16>,
    /// Unicode codepoint -> glyph id
    pub cmap: BTreeMap<u32, u16>,
    /// PDF-safe PostScript name
    pub postscript_name: String,
    /// Family name, if the font declares one
    pub family_name: Option<String>,
    /// Italic angle in degrees (0 when `post` is unreadable)
    pub italic_angle: f32,
    /// Original font program bytes, shared with every clone
    pub raw: Bytes,
}

impl FontDescriptor {
    /// Number of glyphs in the font.
    pub fn num_glyphs(&self) -> usize {
        self.advances.len()
    }

    /// Glyph id for a codepoint, if mapped.
    pub fn glyph_id(&self, codepoint: u32) -> Option<u16> {
        self.cmap.get(&codepoint).copied()
    }

    /// Advance width of a glyph in font units.
    ///
    /// Glyph ids past the end of `hmtx` take the last stored advance, which
    /// [`TrueTypeParser`] already expands, so this is a plain lookup.
    pub fn advance(&self, glyph_id: u16) -> u16 {
        self.advances
            .get(glyph_id as usize)
            .or_else(|| self.advances.last())
            .copied()
            .unwrap_or(0)
    }

    /// Convert a value from font units to 1/1000 em (PDF glyph space).
    pub fn to_pdf_units(&self, value: i32) -> i32 {
        value * 1000 / self.units_per_em as i32
    }

    /// Scale factor from font units to points at `font_size`.
    pub fn scale(&self, font_size: f32) -> f32 {
        font_size / self.units_per_em as f32
    }
}

/// Parser over raw TrueType bytes.
pub struct TrueTypeParser<'a> {
    reader: ByteReader<'a>,
    tables: HashMap<[u8; 4], TableRecord>,
}

impl<'a> TrueTypeParser<'a> {
    /// Read the table directory.
    pub fn new(data: &'a [u8]) -> TrueTypeResult<Self> {
        if data.is_empty() {
            return Err(TrueTypeError::EmptyFont);
        }
        if data.len() < MIN_FONT_SIZE {
            return Err(TrueTypeError::TooSmall(data.len()));
        }

        let reader = ByteReader::new(data);
        let version = reader.u32(0)?;
        // 0x00010000 or 'true'; 'OTTO' (CFF outlines) cannot be a CIDFontType2
        if version != 0x0001_0000 && version != 0x7472_7565 {
            return Err(TrueTypeError::BadHeader(version));
        }

        let num_tables = reader.u16(4)? as usize;
        let mut tables = HashMap::with_capacity(num_tables);
        for i in 0..num_tables {
            let record = 12 + i * 16;
            let tag = reader.slice(record, 4)?;
            let offset = reader.u32(record + 8)?;
            let length = reader.u32(record + 12)?;
            // Reject entries that point outside the file
            reader.slice(offset as usize, length as usize)?;
            tables.insert([tag[0], tag[1], tag[2], tag[3]], TableRecord { offset, length });
        }

        Ok(Self { reader, tables })
    }

    /// Parse a complete [`FontDescriptor`].
    pub fn parse(data: &'a [u8]) -> TrueTypeResult<FontDescriptor> {
        let parser = Self::new(data)?;

        let head = parser.table(b"head")?;
        let units_per_em = parser.reader.u16(head + 18)?.max(16);
        let bbox = [
            parser.reader.i16(head + 36)?,
            parser.reader.i16(head + 38)?,
            parser.reader.i16(head + 40)?,
            parser.reader.i16(head + 42)?,
        ];

        let hhea = parser.table(b"hhea")?;
        let ascent = parser.reader.i16(hhea + 4)?;
        let descent = parser.reader.i16(hhea + 6)?;
        let line_gap = parser.reader.i16(hhea + 8)?;
        let num_h_metrics = parser.reader.u16(hhea + 34)? as usize;

        let maxp = parser.table(b"maxp")?;
        let num_glyphs = parser.reader.u16(maxp + 4)? as usize;

        let advances = parser.advances(num_glyphs, num_h_metrics)?;
        let cmap = parse_cmap_table(&parser.reader, parser.table(b"cmap")?)?;
        let (postscript_name, family_name) = parser.names()?;

        let italic_angle = match parser.italic_angle() {
            Ok(angle) => angle,
            Err(e) => {
                log::warn!("Italic angle unavailable ({}), defaulting to 0", e);
                0.0
            },
        };

        Ok(FontDescriptor {
            units_per_em,
            ascent,
            descent,
            line_gap,
            bbox,
            advances,
            cmap,
            postscript_name,
            family_name,
            italic_angle,
            raw: Bytes::copy_from_slice(data),
        })
    }

    /// Directory entry for a tag.
    pub fn table_record(&self, tag: &[u8; 4]) -> Option<TableRecord> {
        self.tables.get(tag).copied()
    }

    /// Offset of a required table.
    fn table(&self, tag: &[u8; 4]) -> TrueTypeResult<usize> {
        self.table_record(tag)
            .map(|record| record.offset as usize)
            .ok_or_else(|| TrueTypeError::MissingTable(String::from_utf8_lossy(tag).into_owned()))
    }

    /// Per-glyph advances from `hmtx`.
    ///
    /// Only the first `num_h_metrics` glyphs store an advance; every later
    /// glyph repeats the last stored one (monospaced tail).
    fn advances(&self, num_glyphs: usize, num_h_metrics: usize) -> TrueTypeResult<Vec<u16>> {
        let hmtx = self.table(b"hmtx")?;
        let stored = num_h_metrics.min(num_glyphs).max(1);

        let mut advances = Vec::with_capacity(num_glyphs.max(stored));
        for i in 0..stored {
            advances.push(self.reader.u16(hmtx + i * 4)?);
        }
        let last = advances.last().copied().unwrap_or(0);
        advances.resize(num_glyphs.max(stored), last);
        Ok(advances)
    }

    /// PostScript (name id 6) and family (name id 1) names.
    fn names(&self) -> TrueTypeResult<(String, Option<String>)> {
        let name = self.table(b"name")?;
        let count = self.reader.u16(name + 2)? as usize;
        let string_base = name + self.reader.u16(name + 4)? as usize;

        let mut postscript = None;
        let mut family = None;
        for i in 0..count {
            let record = name + 6 + i * 12;
            let platform_id = self.reader.u16(record)?;
            let encoding_id = self.reader.u16(record + 2)?;
            let name_id = self.reader.u16(record + 6)?;
            let length = self.reader.u16(record + 8)? as usize;
            let offset = self.reader.u16(record + 10)? as usize;

            let slot = match name_id {
                6 if postscript.is_none() => &mut postscript,
                1 if family.is_none() => &mut family,
                _ => continue,
            };
            let Ok(bytes) = self.reader.slice(string_base + offset, length) else {
                continue;
            };
            let decoded = decode_name(platform_id, encoding_id, bytes);
            if !decoded.is_empty() {
                *slot = Some(decoded);
            }
        }

        let postscript = postscript
            .or_else(|| family.clone())
            .map(|name| pdf_safe_name(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "EmbeddedFont".to_string());
        Ok((postscript, family))
    }

    /// Italic angle from `post` (16.16 fixed point at offset 4).
    fn italic_angle(&self) -> TrueTypeResult<f32> {
        let post = self.table(b"post")?;
        let fixed = self.reader.i32(post + 4)?;
        Ok(fixed as f32 / 65536.0)
    }
}

/// Decode a `name` record.
///
/// Unicode (platform 0), Windows (3) and ISO 10646 (platform 2, encoding 1)
/// strings are UTF-16BE; anything else is taken byte-for-byte. Control
/// characters are stripped.
pub fn decode_name(platform_id: u16, encoding_id: u16, bytes: &[u8]) -> String {
    let utf16 = matches!(platform_id, 0 | 3) || (platform_id == 2 && encoding_id == 1);
    let text = if utf16 {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    };
    text.chars().filter(|c| !c.is_control()).collect()
}

/// Replace every character outside `[A-Za-z0-9-+_]` so the name is usable
/// as a PDF name object.
pub fn pdf_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
