// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]

//! # PDF Scribe
//!
//! Flow-layout PDF generation with embedded TrueType fonts.
//!
//! ## Features
//!
//! - **Font Embedding**: TrueType programs embedded as Type0/CIDFontType2 with
//!   Identity-H encoding, sparse width arrays and ToUnicode maps
//! - **Paragraphs**: styled runs, greedy line breaking, alignment and
//!   justification, indents, markers, borders and backgrounds that split
//!   cleanly across pages
//! - **Synthetic Styles**: stroked bold and sheared italic when no real face
//!   is bound
//! - **Tables, Lists, Images, Rules**: block primitives that paginate
//!   without splitting rows or images
//! - **Headers and Footers**: `{page}` / `{pages}` placeholders resolved at
//!   output
//! - **Flow Records**: a serde-tagged element type for front ends
//!
//! ## Architecture
//!
//! - [`fonts`]: TrueType parsing, glyph usage and font object emission
//! - [`layout`]: styles, regions, measurement and the paragraph engine
//! - [`writer`]: content streams, pages, tables, lists, images and the
//!   [`Document`] facade
//! - [`elements`]: flow records dispatched onto the document
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_scribe::layout::{ParagraphOptions, TextAlign, TextRun};
//! use pdf_scribe::{Document, DocumentConfig};
//!
//! # fn main() -> pdf_scribe::Result<()> {
//! let config = DocumentConfig::default().with_title("Report").with_compress(true);
//! let mut doc = Document::new(config)?;
//! doc.add_font_file("body", "fonts/DejaVuSans.ttf")?;
//! doc.set_font("body", 11.0, None)?;
//!
//! doc.add_paragraph_runs(
//!     &[TextRun::new("Quarterly "), TextRun::new("results").bold()],
//!     &ParagraphOptions::aligned(TextAlign::Justify),
//! )?;
//!
//! std::fs::write("report.pdf", doc.output()?)?;
//! # Ok(())
//! # }
//! ```

// Error handling
pub mod error;

// Configuration
pub mod config;

// PDF object model
pub mod geometry;
pub mod object;

// Fonts and layout
pub mod fonts;
pub mod layout;

// Flow records
pub mod elements;

// PDF writing
pub mod writer;

pub use config::{DocumentConfig, Margins, PageSize};
pub use error::{Error, Result};
pub use writer::Document;
