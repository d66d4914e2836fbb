//! TrueType parsing and embedded font management.
//!
//! [`TrueTypeParser`] reads the metric tables of a font program into a
//! [`FontDescriptor`]; [`FontRegistry`] owns descriptors by alias, tracks
//! which glyphs were drawn and writes the PDF font objects at output.

pub mod byte_reader;
pub mod cmap;
pub mod font_registry;
pub mod glyph_usage;
pub mod truetype_parser;

#[cfg(test)]
pub(crate) mod test_font;

pub use byte_reader::ByteReader;
pub use font_registry::{FontRegistry, FontVariants, ResolvedFont};
pub use glyph_usage::UsedGlyphSet;
pub use truetype_parser::{FontDescriptor, TrueTypeError, TrueTypeParser, TrueTypeResult};
