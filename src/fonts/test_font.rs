//! Synthetic TrueType fonts for tests.
//!
//! Builds just enough of a font (head, hhea, maxp, hmtx, cmap, name and
//! optionally post) for the parser. There are no outlines.

#![allow(dead_code)]

use std::collections::BTreeMap;

/// Description of a synthetic font.
#[derive(Debug, Clone)]
pub struct TestFont {
    pub units_per_em: u16,
    pub ascent: i16,
    pub descent: i16,
    pub line_gap: i16,
    pub notdef_advance: u16,
    /// Glyph `i + 1` renders `glyphs[i].0` with advance `glyphs[i].1`
    pub glyphs: Vec<(char, u16)>,
    pub postscript_name: Option<String>,
    pub family_name: String,
    /// `None` leaves out the `post` table
    pub italic_angle: Option<f32>,
    /// 4 or 12
    pub cmap_format: u16,
    /// Stored `hmtx` entries; defaults to every glyph
    pub num_h_metrics: Option<u16>,
}

impl Default for TestFont {
    fn default() -> Self {
        Self::latin()
    }
}

impl TestFont {
    /// Printable ASCII plus a bullet: 1000 units/em, space 250, capitals
    /// 600, everything else 500.
    pub fn latin() -> Self {
        let mut glyphs: Vec<(char, u16)> = (0x20u8..=0x7E)
            .map(|b| {
                let c = b as char;
                let advance = match c {
                    ' ' => 250,
                    'A'..='Z' => 600,
                    _ => 500,
                };
                (c, advance)
            })
            .collect();
        glyphs.push(('\u{2022}', 350));
        Self::with_glyphs(&glyphs)
    }

    /// A font covering exactly `glyphs`.
    pub fn with_glyphs(glyphs: &[(char, u16)]) -> Self {
        Self {
            units_per_em: 1000,
            ascent: 800,
            descent: -200,
            line_gap: 0,
            notdef_advance: 500,
            glyphs: glyphs.to_vec(),
            postscript_name: Some("TestSans-Regular".to_string()),
            family_name: "Test Sans".to_string(),
            italic_angle: Some(0.0),
            cmap_format: 4,
            num_h_metrics: None,
        }
    }

    /// Serialize the font program.
    pub fn build(&self) -> Vec<u8> {
        let num_glyphs = self.glyphs.len() as u16 + 1;
        let num_h_metrics = self.num_h_metrics.unwrap_or(num_glyphs).clamp(1, num_glyphs);

        let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"head", self.head()),
            (*b"hhea", self.hhea(num_h_metrics)),
            (*b"maxp", maxp(num_glyphs)),
            (*b"hmtx", self.hmtx(num_h_metrics)),
            (*b"cmap", self.cmap()),
            (*b"name", self.name()),
        ];
        if let Some(angle) = self.italic_angle {
            tables.push((*b"post", post(angle)));
        }

        let mut out = Vec::new();
        push_u32(&mut out, 0x0001_0000);
        push_u16(&mut out, tables.len() as u16);
        push_u16(&mut out, 0);
        push_u16(&mut out, 0);
        push_u16(&mut out, 0);

        let mut offset = 12 + 16 * tables.len();
        for (tag, data) in &tables {
            out.extend_from_slice(tag);
            push_u32(&mut out, 0);
            push_u32(&mut out, offset as u32);
            push_u32(&mut out, data.len() as u32);
            offset += padded(data.len());
        }
        for (_, data) in &tables {
            out.extend_from_slice(data);
            out.resize(out.len() + padded(data.len()) - data.len(), 0);
        }
        out
    }

    fn head(&self) -> Vec<u8> {
        let mut t = vec![0u8; 54];
        t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        t[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
        t[18..20].copy_from_slice(&self.units_per_em.to_be_bytes());
        t[36..38].copy_from_slice(&0i16.to_be_bytes());
        t[38..40].copy_from_slice(&self.descent.to_be_bytes());
        t[40..42].copy_from_slice(&(self.units_per_em as i16).to_be_bytes());
        t[42..44].copy_from_slice(&self.ascent.to_be_bytes());
        t
    }

    fn hhea(&self, num_h_metrics: u16) -> Vec<u8> {
        let mut t = vec![0u8; 36];
        t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        t[4..6].copy_from_slice(&self.ascent.to_be_bytes());
        t[6..8].copy_from_slice(&self.descent.to_be_bytes());
        t[8..10].copy_from_slice(&self.line_gap.to_be_bytes());
        t[34..36].copy_from_slice(&num_h_metrics.to_be_bytes());
        t
    }

    fn hmtx(&self, num_h_metrics: u16) -> Vec<u8> {
        let advances: Vec<u16> = std::iter::once(self.notdef_advance)
            .chain(self.glyphs.iter().map(|&(_, advance)| advance))
            .collect();
        let mut t = Vec::new();
        for &advance in &advances[..num_h_metrics as usize] {
            push_u16(&mut t, advance);
            push_u16(&mut t, 0);
        }
        // Left side bearings of the monospaced tail
        for _ in num_h_metrics as usize..advances.len() {
            push_u16(&mut t, 0);
        }
        t
    }

    fn codepoints(&self) -> BTreeMap<u32, u16> {
        self.glyphs
            .iter()
            .enumerate()
            .map(|(i, &(c, _))| (c as u32, i as u16 + 1))
            .collect()
    }

    fn cmap(&self) -> Vec<u8> {
        let map = self.codepoints();
        let (encoding, subtable) = if self.cmap_format == 12 {
            (10, cmap_format12(&map))
        } else {
            (1, cmap_format4(&map))
        };
        let mut t = Vec::new();
        push_u16(&mut t, 0);
        push_u16(&mut t, 1);
        push_u16(&mut t, 3);
        push_u16(&mut t, encoding);
        push_u32(&mut t, 12);
        t.extend_from_slice(&subtable);
        t
    }

    fn name(&self) -> Vec<u8> {
        let mut entries = vec![(1u16, self.family_name.clone())];
        if let Some(ps) = &self.postscript_name {
            entries.push((6, ps.clone()));
        }

        let mut strings = Vec::new();
        let mut records = Vec::new();
        for (name_id, text) in &entries {
            let encoded: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
            push_u16(&mut records, 3);
            push_u16(&mut records, 1);
            push_u16(&mut records, 0x0409);
            push_u16(&mut records, *name_id);
            push_u16(&mut records, encoded.len() as u16);
            push_u16(&mut records, strings.len() as u16);
            strings.extend_from_slice(&encoded);
        }

        let mut t = Vec::new();
        push_u16(&mut t, 0);
        push_u16(&mut t, entries.len() as u16);
        push_u16(&mut t, (6 + 12 * entries.len()) as u16);
        t.extend_from_slice(&records);
        t.extend_from_slice(&strings);
        t
    }
}

/// The default test font as bytes.
pub fn latin_font() -> Vec<u8> {
    TestFont::latin().build()
}

fn maxp(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0000_5000);
    push_u16(&mut t, num_glyphs);
    t
}

fn post(italic_angle: f32) -> Vec<u8> {
    let mut t = vec![0u8; 32];
    t[0..4].copy_from_slice(&0x0003_0000u32.to_be_bytes());
    let fixed = (italic_angle * 65536.0).round() as i32;
    t[4..8].copy_from_slice(&fixed.to_be_bytes());
    t
}

fn cmap_format4(map: &BTreeMap<u32, u16>) -> Vec<u8> {
    let mut segments: Vec<(u16, u16, u16)> = map
        .iter()
        .filter(|(code, _)| **code < 0xFFFF)
        .map(|(&code, &glyph)| (code as u16, code as u16, glyph.wrapping_sub(code as u16)))
        .collect();
    segments.push((0xFFFF, 0xFFFF, 1));
    let seg_count = segments.len() as u16;

    let mut search_range = 1u16;
    let mut entry_selector = 0u16;
    while search_range * 2 <= seg_count {
        search_range *= 2;
        entry_selector += 1;
    }

    let mut t = Vec::new();
    push_u16(&mut t, 4);
    push_u16(&mut t, 0);
    push_u16(&mut t, 0);
    push_u16(&mut t, seg_count * 2);
    push_u16(&mut t, search_range * 2);
    push_u16(&mut t, entry_selector);
    push_u16(&mut t, seg_count * 2 - search_range * 2);
    for &(_, end, _) in &segments {
        push_u16(&mut t, end);
    }
    push_u16(&mut t, 0);
    for &(start, _, _) in &segments {
        push_u16(&mut t, start);
    }
    for &(_, _, delta) in &segments {
        push_u16(&mut t, delta);
    }
    for _ in &segments {
        push_u16(&mut t, 0);
    }
    let length = t.len() as u16;
    t[2..4].copy_from_slice(&length.to_be_bytes());
    t
}

fn cmap_format12(map: &BTreeMap<u32, u16>) -> Vec<u8> {
    let mut t = Vec::new();
    push_u16(&mut t, 12);
    push_u16(&mut t, 0);
    push_u32(&mut t, (16 + 12 * map.len()) as u32);
    push_u32(&mut t, 0);
    push_u32(&mut t, map.len() as u32);
    for (&code, &glyph) in map {
        push_u32(&mut t, code);
        push_u32(&mut t, code);
        push_u32(&mut t, glyph as u32);
    }
    t
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}
