//! TrueType `cmap` subtable decoding.
//!
//! Only Windows Unicode subtables are considered (platform 3, encoding 1 for
//! the BMP or encoding 10 for full UCS-4). When both a format 12 and a
//! format 4 subtable are present, format 12 wins because it covers
//! supplementary planes.
//!
//! Both decoders expand to a direct codepoint -> glyph map and drop any
//! codepoint that resolves to glyph 0 (`.notdef`).

use std::collections::BTreeMap;

use super::byte_reader::ByteReader;
use super::truetype_parser::{TrueTypeError, TrueTypeResult};

/// Highest valid Unicode scalar value.
const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Decode the `cmap` table found at `table_offset`.
pub fn parse_cmap_table(
    reader: &ByteReader<'_>,
    table_offset: usize,
) -> TrueTypeResult<BTreeMap<u32, u16>> {
    let num_tables = reader.u16(table_offset + 2)? as usize;

    let mut format4 = None;
    let mut format12 = None;

    for i in 0..num_tables {
        let record = table_offset + 4 + i * 8;
        let platform_id = reader.u16(record)?;
        let encoding_id = reader.u16(record + 2)?;
        if platform_id != 3 || !(encoding_id == 1 || encoding_id == 10) {
            continue;
        }
        let subtable = table_offset + reader.u32(record + 4)? as usize;
        match reader.u16(subtable)? {
            4 if format4.is_none() => format4 = Some(subtable),
            12 if format12.is_none() => format12 = Some(subtable),
            _ => {},
        }
    }

    match (format12, format4) {
        (Some(offset), _) => parse_format12(reader, offset),
        (None, Some(offset)) => parse_format4(reader, offset),
        (None, None) => Err(TrueTypeError::UnsupportedCmap),
    }
}

/// Decode a format 4 (segment mapping to delta values) subtable.
pub fn parse_format4(
    reader: &ByteReader<'_>,
    offset: usize,
) -> TrueTypeResult<BTreeMap<u32, u16>> {
    let seg_count = (reader.u16(offset + 6)? / 2) as usize;
    let end_codes = offset + 14;
    let start_codes = end_codes + seg_count * 2 + 2;
    let id_deltas = start_codes + seg_count * 2;
    let id_range_offsets = id_deltas + seg_count * 2;

    let mut map = BTreeMap::new();
    for seg in 0..seg_count {
        let end = reader.u16(end_codes + seg * 2)?;
        let start = reader.u16(start_codes + seg * 2)?;
        let delta = reader.u16(id_deltas + seg * 2)?;
        let range_offset_pos = id_range_offsets + seg * 2;
        let range_offset = reader.u16(range_offset_pos)?;

        if start > end {
            continue;
        }

        for code in start..=end {
            // 0xFFFF terminates the last segment and never maps a glyph
            if code == 0xFFFF {
                break;
            }
            let glyph = if range_offset == 0 {
                code.wrapping_add(delta)
            } else {
                let addr = range_offset_pos
                    + range_offset as usize
                    + (code - start) as usize * 2;
                match reader.u16(addr)? {
                    0 => 0,
                    raw => raw.wrapping_add(delta),
                }
            };
            if glyph != 0 {
                map.insert(code as u32, glyph);
            }
        }
    }
    Ok(map)
}

/// Decode a format 12 (segmented coverage) subtable.
pub fn parse_format12(
    reader: &ByteReader<'_>,
    offset: usize,
) -> TrueTypeResult<BTreeMap<u32, u16>> {
    let num_groups = reader.u32(offset + 12)? as usize;

    let mut map = BTreeMap::new();
    for group in 0..num_groups {
        let record = offset + 16 + group * 12;
        let start_char = reader.u32(record)?;
        let end_char = reader.u32(record + 4)?.min(MAX_CODEPOINT);
        let start_glyph = reader.u32(record + 8)?;

        if start_char > end_char {
            continue;
        }

        for code in start_char..=end_char {
            let glyph = start_glyph + (code - start_char);
            if glyph == 0 || glyph > u16::MAX as u32 {
                continue;
            }
            map.insert(code, glyph as u16);
        }
    }
    Ok(map)
}
