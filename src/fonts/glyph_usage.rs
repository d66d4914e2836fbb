//! Glyph usage tracking for font embedding.
//!
//! Every glyph drawn with an embedded font is recorded here together with
//! the codepoint that produced it. At finalization the set drives the sparse
//! `/W` width array and the ToUnicode CMap.
//!
//! Each alias's map is seeded with `0 -> U+0000` so `.notdef` is always part
//! of the subset. Entries are never removed, and the first codepoint recorded
//! for a glyph wins (several codepoints can share one glyph).

use std::collections::{BTreeMap, HashMap};

/// Used glyphs per font alias: alias -> (glyph id -> codepoint).
#[derive(Debug, Default, Clone)]
pub struct UsedGlyphSet {
    by_alias: HashMap<String, BTreeMap<u16, u32>>,
}

impl UsedGlyphSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a glyph as drawn for `alias`.
    ///
    /// Returns `true` when the glyph was not recorded before.
    pub fn record(&mut self, alias: &str, glyph_id: u16, codepoint: u32) -> bool {
        let glyphs = self
            .by_alias
            .entry(alias.to_string())
            .or_insert_with(seeded);
        if glyphs.contains_key(&glyph_id) {
            return false;
        }
        glyphs.insert(glyph_id, codepoint);
        true
    }

    /// Used glyphs for an alias, sorted by glyph id.
    pub fn glyphs(&self, alias: &str) -> Option<&BTreeMap<u16, u32>> {
        self.by_alias.get(alias)
    }

    /// Whether anything was drawn with `alias`.
    pub fn is_used(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }

    /// Number of glyphs recorded for `alias`, including `.notdef`.
    pub fn glyph_count(&self, alias: &str) -> usize {
        self.by_alias.get(alias).map_or(0, BTreeMap::len)
    }
}

fn seeded() -> BTreeMap<u16, u32> {
    let mut glyphs = BTreeMap::new();
    glyphs.insert(0, 0);
    glyphs
}
