//! PDF writing.
//!
//! This module turns laid-out content into PDF objects.
//!
//! ## Architecture
//!
//! ```text
//! Document (paragraphs, tables, lists, images, rules)
//!     ↓
//! [RenderContext] (fonts, style, regions, pages; threaded through layout)
//!     ↓
//! [ContentStreamBuilder] (per-page operators)
//!     ↓
//! [ObjectWriter] (object table, xref, trailer)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use pdf_scribe::writer::{Document, TableCell, TableOptions};
//! use pdf_scribe::DocumentConfig;
//!
//! let mut doc = Document::new(DocumentConfig::default())?;
//! doc.add_font_file("body", "DejaVuSans.ttf")?;
//! doc.set_font("body", 10.0, None)?;
//! doc.add_table_data(
//!     &[vec![TableCell::text("Name"), TableCell::text("Qty")]],
//!     &TableOptions { header_rows: 1, ..Default::default() },
//! )?;
//! let bytes = doc.output()?;
//! ```

mod content_stream;
mod document;
mod image_handler;
mod list_renderer;
mod object_serializer;
mod object_writer;
mod page;
mod page_template;
mod render_context;
mod table_renderer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp, TextRenderMode, KAPPA};
pub use document::{add_horizontal_line, add_spacer, Document, RuleOptions, DEFAULT_FONT_ALIAS};
pub use image_handler::{
    add_image_block, ColorSpace, ImageAlign, ImageData, ImageInfo, ImageOptions, ImageProvider,
    ImageRegistry, InlineImage,
};
pub use list_renderer::{add_list, ListItem, ListOptions, ListStyle};
pub use object_serializer::{format_real, ObjectSerializer};
pub use object_writer::{compress_data, ObjectWriter};
pub use page::{LinkAnnotation, Page, PageResources, PageSet, ResourceKind};
pub use page_template::{HFAlignment, HeaderFooter, HeaderFooterKind, PageTemplate, Placeholder};
pub use render_context::RenderContext;
pub use table_renderer::{
    add_table_data, resolve_column_widths, ColumnWidth, TableCell, TableLayout, TableOptions, TableRow,
};
