//! Embedded font registry.
//!
//! Fonts are registered under caller-chosen aliases and embedded as
//! Type0 / CIDFontType2 fonts with Identity-H encoding (ISO 32000-1
//! §9.7), so text is written as two-byte glyph ids. Every glyph drawn is
//! recorded in a [`UsedGlyphSet`]; only fonts that were actually drawn with
//! are written out, with a sparse `/W` array and a ToUnicode CMap built from
//! the recorded glyphs.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::glyph_usage::UsedGlyphSet;
use super::truetype_parser::{FontDescriptor, TrueTypeParser};
use crate::error::{Error, Result};
use crate::layout::StyleMarkers;
use crate::object::Object;
use crate::writer::{ObjectSerializer as Obj, ObjectWriter};

/// Maximum entries per `beginbfchar` section.
const BFCHAR_CHUNK: usize = 100;

/// Alternate aliases for the styled faces of a family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontVariants {
    /// Alias of the bold face
    pub bold: Option<String>,
    /// Alias of the italic face
    pub italic: Option<String>,
    /// Alias of the bold italic face
    pub bold_italic: Option<String>,
}

/// Outcome of style resolution: the alias to draw with, plus what still has
/// to be simulated because no real face is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFont {
    /// Alias to select
    pub alias: String,
    /// Stroke the outlines to fake bold
    pub synthetic_bold: bool,
    /// Shear the text matrix to fake italic
    pub synthetic_italic: bool,
}

/// Owns every embedded font by alias.
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: IndexMap<String, FontDescriptor>,
    variants: HashMap<String, FontVariants>,
    used: UsedGlyphSet,
}

impl FontRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a TrueType font under `alias`.
    ///
    /// Re-registering an alias replaces the previous font.
    pub fn add_font(&mut self, alias: impl Into<String>, data: Vec<u8>) -> Result<()> {
        let alias = alias.into();
        let descriptor = TrueTypeParser::parse(&data).map_err(|source| Error::TrueType {
            alias: alias.clone(),
            source,
        })?;
        log::debug!(
            "Registered font '{}' ({}, {} glyphs, {} cmap entries)",
            alias,
            descriptor.postscript_name,
            descriptor.num_glyphs(),
            descriptor.cmap.len()
        );
        self.fonts.insert(alias, descriptor);
        Ok(())
    }

    /// Read a font file from disk and register it.
    pub fn add_font_file(&mut self, alias: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| Error::FontFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_font(alias, data)
    }

    /// Whether `alias` is registered.
    pub fn font_exists(&self, alias: &str) -> bool {
        self.fonts.contains_key(alias)
    }

    /// Parsed metrics for `alias`.
    pub fn descriptor(&self, alias: &str) -> Result<&FontDescriptor> {
        self.fonts
            .get(alias)
            .ok_or_else(|| Error::UnknownFont(alias.to_string()))
    }

    /// Registered aliases in registration order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// Declare the bold / italic / bold-italic faces of `base`.
    ///
    /// Every alias named must already be registered.
    pub fn bind_variants(&mut self, base: &str, variants: FontVariants) -> Result<()> {
        self.descriptor(base)?;
        for alias in [&variants.bold, &variants.italic, &variants.bold_italic]
            .into_iter()
            .flatten()
        {
            self.descriptor(alias)?;
        }
        self.variants.insert(base.to_string(), variants);
        Ok(())
    }

    /// Pick the face for `base` under `markers`.
    ///
    /// Bold italic falls back to the bold face (shearing it), then the italic
    /// face (stroking it), then `base` with both simulated.
    pub fn resolve_alias_by_style(&self, base: &str, markers: StyleMarkers) -> ResolvedFont {
        let bold = markers.contains(StyleMarkers::BOLD);
        let italic = markers.contains(StyleMarkers::ITALIC);
        let variants = self.variants.get(base).cloned().unwrap_or_default();

        let (alias, synthetic_bold, synthetic_italic) = match (bold, italic) {
            (true, true) => match (variants.bold_italic, variants.bold, variants.italic) {
                (Some(alias), _, _) => (alias, false, false),
                (None, Some(alias), _) => (alias, false, true),
                (None, None, Some(alias)) => (alias, true, false),
                (None, None, None) => (base.to_string(), true, true),
            },
            (true, false) => match variants.bold {
                Some(alias) => (alias, false, false),
                None => (base.to_string(), true, false),
            },
            (false, true) => match variants.italic {
                Some(alias) => (alias, false, false),
                None => (base.to_string(), false, true),
            },
            (false, false) => (base.to_string(), false, false),
        };

        ResolvedFont {
            alias,
            synthetic_bold,
            synthetic_italic,
        }
    }

    /// Page resource label of a font (`F1`, `F2`, ... in registration order).
    pub fn resource_label(&self, alias: &str) -> Result<String> {
        self.fonts
            .get_index_of(alias)
            .map(|index| format!("F{}", index + 1))
            .ok_or_else(|| Error::UnknownFont(alias.to_string()))
    }

    /// Record that `glyph_id` was drawn for `codepoint`.
    pub fn record_glyph_use(&mut self, alias: &str, glyph_id: u16, codepoint: u32) -> bool {
        self.used.record(alias, glyph_id, codepoint)
    }

    /// Glyphs recorded so far.
    pub fn used_glyphs(&self) -> &UsedGlyphSet {
        &self.used
    }

    /// Encode `text` as an Identity-H hex string and record its glyphs.
    ///
    /// Characters missing from the font are written as glyph 0.
    pub fn encode_text(&mut self, alias: &str, text: &str) -> Result<String> {
        let descriptor = self
            .fonts
            .get(alias)
            .ok_or_else(|| Error::UnknownFont(alias.to_string()))?;

        let mut hex = String::with_capacity(text.len() * 4 + 2);
        hex.push('<');
        for ch in text.chars() {
            let codepoint = ch as u32;
            let glyph_id = match descriptor.glyph_id(codepoint) {
                Some(gid) => gid,
                None => {
                    log::warn!("Font '{}' has no glyph for U+{:04X}", alias, codepoint);
                    0
                },
            };
            // Glyph 0 is already seeded, so this only makes the alias used
            self.used.record(alias, glyph_id, codepoint);
            hex.push_str(&format!("{:04X}", glyph_id));
        }
        hex.push('>');
        Ok(hex)
    }

    /// Width of `text` in points.
    ///
    /// `letter_spacing` is added once per character, matching how `Tc`
    /// is applied when the text is shown.
    pub fn text_width(&self, alias: &str, text: &str, size: f32, letter_spacing: f32) -> Result<f32> {
        let descriptor = self.descriptor(alias)?;
        let mut units = 0u32;
        let mut chars = 0usize;
        for ch in text.chars() {
            let glyph_id = descriptor.glyph_id(ch as u32).unwrap_or(0);
            units += descriptor.advance(glyph_id) as u32;
            chars += 1;
        }
        Ok(units as f32 * descriptor.scale(size) + letter_spacing * chars as f32)
    }

    /// Write the object graph of every font that was drawn with.
    ///
    /// Returns alias -> Type0 font object id.
    pub fn emit_font_objects(
        &self,
        writer: &mut ObjectWriter,
        compress: bool,
    ) -> Result<IndexMap<String, u32>> {
        let mut ids = IndexMap::new();
        for (alias, descriptor) in &self.fonts {
            let Some(glyphs) = self.used.glyphs(alias) else {
                continue;
            };
            let type0 = emit_font(writer, descriptor, glyphs, compress);
            log::debug!(
                "Embedded font '{}' as object {} ({} glyphs used)",
                alias,
                type0,
                glyphs.len()
            );
            ids.insert(alias.clone(), type0);
        }
        Ok(ids)
    }
}

fn emit_font(
    writer: &mut ObjectWriter,
    descriptor: &FontDescriptor,
    glyphs: &BTreeMap<u16, u32>,
    compress: bool,
) -> u32 {
    let units = |value: i32| descriptor.to_pdf_units(value) as i64;
    let default_width = default_width(descriptor);

    let font_file = writer.add_object(ObjectWriter::encoded_stream_body(
        Some(&format!("<< /Length1 {} >>", descriptor.raw.len())),
        &descriptor.raw,
        compress,
    ));

    let mut flags = 32;
    if descriptor.italic_angle != 0.0 {
        flags |= 64;
    }
    let [x_min, y_min, x_max, y_max] = descriptor.bbox;
    let font_descriptor = writer.add_value(&Obj::dict(vec![
        ("Type", Obj::name("FontDescriptor")),
        ("FontName", Obj::name(&descriptor.postscript_name)),
        ("Flags", Obj::integer(flags)),
        (
            "FontBBox",
            Obj::array(vec![
                Obj::integer(units(x_min as i32)),
                Obj::integer(units(y_min as i32)),
                Obj::integer(units(x_max as i32)),
                Obj::integer(units(y_max as i32)),
            ]),
        ),
        ("ItalicAngle", Obj::real(descriptor.italic_angle as f64)),
        ("Ascent", Obj::integer(units(descriptor.ascent as i32))),
        ("Descent", Obj::integer(units(descriptor.descent as i32))),
        ("CapHeight", Obj::integer(units(descriptor.ascent as i32))),
        ("StemV", Obj::integer(80)),
        ("FontFile2", Obj::reference(font_file)),
    ]));

    let to_unicode = writer.add_object(ObjectWriter::encoded_stream_body(
        None,
        to_unicode_cmap(glyphs).as_bytes(),
        compress,
    ));

    let cid_font = writer.add_value(&Obj::dict(vec![
        ("Type", Obj::name("Font")),
        ("Subtype", Obj::name("CIDFontType2")),
        ("BaseFont", Obj::name(&descriptor.postscript_name)),
        (
            "CIDSystemInfo",
            Obj::dict(vec![
                ("Registry", Obj::string("Adobe")),
                ("Ordering", Obj::string("Identity")),
                ("Supplement", Obj::integer(0)),
            ]),
        ),
        ("FontDescriptor", Obj::reference(font_descriptor)),
        ("CIDToGIDMap", Obj::name("Identity")),
        ("DW", Obj::integer(default_width)),
        ("W", width_array(descriptor, glyphs, default_width)),
    ]));

    writer.add_value(&Obj::dict(vec![
        ("Type", Obj::name("Font")),
        ("Subtype", Obj::name("Type0")),
        ("BaseFont", Obj::name(&descriptor.postscript_name)),
        ("Encoding", Obj::name("Identity-H")),
        ("DescendantFonts", Obj::array(vec![Obj::reference(cid_font)])),
        ("ToUnicode", Obj::reference(to_unicode)),
    ]))
}

/// Default glyph width in 1/1000 em: the space glyph's advance, else the
/// mean advance.
pub fn default_width(descriptor: &FontDescriptor) -> i64 {
    let advance = match descriptor.glyph_id(0x20) {
        Some(gid) => descriptor.advance(gid) as i64,
        None if descriptor.advances.is_empty() => 0,
        None => {
            let total: i64 = descriptor.advances.iter().map(|&a| a as i64).sum();
            total / descriptor.advances.len() as i64
        },
    };
    descriptor.to_pdf_units(advance as i32) as i64
}

/// Sparse `/W` array: runs of consecutive glyph ids whose width differs
/// from the default, as `start [w1 w2 ...]`.
pub fn width_array(
    descriptor: &FontDescriptor,
    glyphs: &BTreeMap<u16, u32>,
    default_width: i64,
) -> Object {
    let mut entries = Vec::new();
    let mut run: Option<(u16, Vec<Object>)> = None;
    let mut last_gid = None;

    for &gid in glyphs.keys() {
        let width = descriptor.to_pdf_units(descriptor.advance(gid) as i32) as i64;
        let contiguous = last_gid.is_some_and(|last: u16| last.checked_add(1) == Some(gid));
        last_gid = Some(gid);

        if width == default_width {
            flush_run(&mut entries, run.take());
            continue;
        }
        match &mut run {
            Some((_, widths)) if contiguous => widths.push(Obj::integer(width)),
            _ => {
                flush_run(&mut entries, run.take());
                run = Some((gid, vec![Obj::integer(width)]));
            },
        }
    }
    flush_run(&mut entries, run);
    Obj::array(entries)
}

fn flush_run(entries: &mut Vec<Object>, run: Option<(u16, Vec<Object>)>) {
    if let Some((start, widths)) = run {
        entries.push(Obj::integer(start as i64));
        entries.push(Obj::array(widths));
    }
}

/// ToUnicode CMap for the used glyphs (glyph 0 excluded).
pub fn to_unicode_cmap(glyphs: &BTreeMap<u16, u32>) -> String {
    let mut cmap = String::new();
    cmap.push_str("/CIDInit /ProcSet findresource begin\n");
    cmap.push_str("12 dict begin\n");
    cmap.push_str("begincmap\n");
    cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
    cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
    cmap.push_str("/CMapType 2 def\n");
    cmap.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    let mappings: Vec<(u16, u32)> = glyphs
        .iter()
        .filter(|(&gid, _)| gid != 0)
        .map(|(&gid, &cp)| (gid, cp))
        .collect();
    for chunk in mappings.chunks(BFCHAR_CHUNK) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for &(gid, codepoint) in chunk {
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, utf16_hex(codepoint)));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\n");
    cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
    cmap.push_str("end\nend\n");
    cmap
}

/// UTF-16BE hex for a codepoint, as a surrogate pair above the BMP.
fn utf16_hex(codepoint: u32) -> String {
    if codepoint <= 0xFFFF {
        format!("{:04X}", codepoint)
    } else {
        let v = codepoint - 0x10000;
        format!("{:04X}{:04X}", 0xD800 + (v >> 10), 0xDC00 + (v & 0x3FF))
    }
}
