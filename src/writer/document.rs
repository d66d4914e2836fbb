//! The document facade.
//!
//! [`Document`] owns the [`RenderContext`] and the header/footer template,
//! exposes the drawing primitives and assembles the final PDF in
//! [`Document::output`].
//!
//! # Example
//!
//! ```ignore
//! use pdf_scribe::{Document, DocumentConfig};
//! use pdf_scribe::layout::{ParagraphOptions, TextRun};
//!
//! let mut doc = Document::new(DocumentConfig::default().with_title("Notes"))?;
//! doc.add_font_file("body", "fonts/DejaVuSans.ttf")?;
//! doc.set_font("body", 11.0, None);
//! doc.add_paragraph_runs(&[TextRun::new("Hello, "), TextRun::new("world").bold()], &ParagraphOptions::default())?;
//! let bytes = doc.output()?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::image_handler::{add_image_block, ColorSpace, ImageData, ImageOptions, ImageProvider};
use super::list_renderer::{add_list, ListItem, ListOptions};
use super::object_serializer::ObjectSerializer as Obj;
use super::object_writer::ObjectWriter;
use super::page::ResourceKind;
use super::page_template::{HeaderFooter, PageTemplate};
use super::render_context::RenderContext;
use super::table_renderer::{add_table_data, TableLayout, TableOptions, TableRow};
use crate::config::{pdf_date, DocumentConfig};
use crate::elements::FlowElement;
use crate::error::{Error, Result};
use crate::fonts::FontVariants;
use crate::layout::{Color, ParagraphLayout, ParagraphOptions, StyleOptions, TextLayoutEngine, TextRun};
use crate::object::Object;

/// Alias the bootstrapped default font is registered under.
pub const DEFAULT_FONT_ALIAS: &str = "default";

/// Options for [`Document::add_horizontal_line`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    /// Stroke width
    pub thickness: f32,
    pub color: Color,
    pub space_before: f32,
    pub space_after: f32,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            thickness: 0.5,
            color: Color::black(),
            space_before: 6.0,
            space_after: 6.0,
        }
    }
}

/// Draw a rule across the active region.
///
/// The whole rule, margins included, moves to the next page when it does
/// not fit.
pub fn add_horizontal_line(ctx: &mut RenderContext, options: &RuleOptions) {
    let thickness = options.thickness.max(0.0);
    ctx.check_page_break(options.space_before + thickness + options.space_after);
    ctx.layout.advance_cursor(options.space_before + thickness / 2.0);

    let y = ctx.layout.cursor_y();
    let x = ctx.layout.x();
    let width = ctx.layout.width();
    if thickness > 0.0 {
        if let Some(content) = ctx.content() {
            content
                .save_state()
                .stroke_color(options.color)
                .set_line_width(thickness)
                .move_to(x, y)
                .line_to(x + width, y)
                .stroke()
                .restore_state();
        }
    }
    ctx.layout.advance_cursor(thickness / 2.0 + options.space_after);
}

/// Move the cursor down by `height` points.
pub fn add_spacer(ctx: &mut RenderContext, height: f32) {
    ctx.layout.advance_cursor(height);
}

/// A PDF document being built.
#[derive(Debug)]
pub struct Document {
    config: DocumentConfig,
    ctx: RenderContext,
    template: PageTemplate,
    pages_id: u32,
}

impl Document {
    /// Create a document using the built-in image registry.
    ///
    /// Each default font candidate is tried in order; the first that loads
    /// becomes the active font under [`DEFAULT_FONT_ALIAS`]. Candidates that
    /// fail are skipped with a warning, and when all fail no font is set.
    pub fn new(config: DocumentConfig) -> Result<Self> {
        config.validate()?;
        let ctx = RenderContext::new(&config);
        Ok(Self::assemble(config, ctx))
    }

    /// Create a document drawing images from `images`.
    pub fn with_images(config: DocumentConfig, images: Box<dyn ImageProvider>) -> Result<Self> {
        config.validate()?;
        let ctx = RenderContext::with_images(&config, images);
        Ok(Self::assemble(config, ctx))
    }

    fn assemble(config: DocumentConfig, mut ctx: RenderContext) -> Self {
        let pages_id = ctx.writer.new_object_id();
        let mut doc = Self {
            config,
            ctx,
            template: PageTemplate::new(),
            pages_id,
        };
        doc.load_default_font();
        doc
    }

    fn load_default_font(&mut self) {
        for path in &self.config.default_font_candidates {
            match self.ctx.fonts.add_font_file(DEFAULT_FONT_ALIAS, path) {
                Ok(()) => {
                    log::debug!("Default font loaded from {}", path.display());
                    self.ctx
                        .style
                        .set_font(DEFAULT_FONT_ALIAS, self.config.default_font_size, None);
                    return;
                },
                Err(e) => log::warn!("Skipping default font candidate: {}", e),
            }
        }
        if !self.config.default_font_candidates.is_empty() {
            log::warn!("No default font candidate could be loaded; no font is active");
        }
    }

    /// The configuration the document was created with.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Shared layout state, for collaborators that draw directly.
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Mutable layout state.
    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    // ---- fonts ----

    /// Register a TrueType font from memory.
    pub fn add_font(&mut self, alias: impl Into<String>, data: Vec<u8>) -> Result<()> {
        self.ctx.fonts.add_font(alias, data)
    }

    /// Register a TrueType font from a file.
    pub fn add_font_file(&mut self, alias: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        self.ctx.fonts.add_font_file(alias, path)
    }

    /// Declare the bold/italic faces of `base`.
    pub fn bind_variants(&mut self, base: &str, variants: FontVariants) -> Result<()> {
        self.ctx.fonts.bind_variants(base, variants)
    }

    /// Whether `alias` is registered.
    pub fn font_exists(&self, alias: &str) -> bool {
        self.ctx.fonts.font_exists(alias)
    }

    /// Make `alias` the active font.
    pub fn set_font(&mut self, alias: &str, size: f32, line_height: Option<f32>) -> Result<()> {
        if !self.ctx.fonts.font_exists(alias) {
            return Err(Error::UnknownFont(alias.to_string()));
        }
        self.ctx.style.set_font(alias, size, line_height);
        Ok(())
    }

    /// Change the active style for everything drawn afterwards.
    pub fn apply_style(&mut self, options: &StyleOptions) {
        self.ctx.style.apply_options(options);
    }

    // ---- images ----

    /// Register a JPEG file with the image provider.
    pub fn add_jpeg(&mut self, alias: &str, data: Vec<u8>) -> Result<()> {
        let image = ImageData::jpeg(data).map_err(|reason| Error::InvalidImage {
            alias: alias.to_string(),
            reason,
        })?;
        self.ctx.images.register(alias, image)
    }

    /// Register raw 8-bit samples with the image provider.
    pub fn add_raw_image(
        &mut self,
        alias: &str,
        width: u32,
        height: u32,
        color_space: ColorSpace,
        data: Vec<u8>,
    ) -> Result<()> {
        let image = ImageData::raw(width, height, color_space, data).map_err(|reason| Error::InvalidImage {
            alias: alias.to_string(),
            reason,
        })?;
        self.ctx.images.register(alias, image)
    }

    // ---- drawing primitives ----

    /// Lay out and draw a paragraph of styled runs.
    pub fn add_paragraph_runs(&mut self, runs: &[TextRun], options: &ParagraphOptions) -> Result<ParagraphLayout> {
        TextLayoutEngine::add_paragraph_runs(&mut self.ctx, runs, options)
    }

    /// Height a paragraph would take at the cursor, without drawing it.
    pub fn compute_paragraph_height(&mut self, runs: &[TextRun], options: &ParagraphOptions) -> Result<f32> {
        TextLayoutEngine::compute_height(&mut self.ctx, runs, options)
    }

    /// Lay out and draw a table.
    pub fn add_table_data(&mut self, rows: &[TableRow], options: &TableOptions) -> Result<TableLayout> {
        add_table_data(&mut self.ctx, rows, options)
    }

    /// Lay out and draw a list. Returns the number of items drawn.
    pub fn add_list(&mut self, items: &[ListItem], options: &ListOptions) -> Result<usize> {
        add_list(&mut self.ctx, items, options)
    }

    /// Place a registered image as a block.
    pub fn add_image_block(&mut self, alias: &str, options: &ImageOptions) -> Result<()> {
        add_image_block(&mut self.ctx, alias, options)
    }

    /// Move the cursor down.
    pub fn add_spacer(&mut self, height: f32) {
        add_spacer(&mut self.ctx, height);
    }

    /// Draw a horizontal rule across the active region.
    pub fn add_horizontal_line(&mut self, options: &RuleOptions) {
        add_horizontal_line(&mut self.ctx, options);
    }

    /// Draw one flow record.
    pub fn add_flow(&mut self, element: &FlowElement) -> Result<()> {
        element.render(&mut self.ctx)
    }

    /// Start a new page.
    pub fn new_page(&mut self) {
        self.ctx.new_page();
    }

    /// Name an existing object in the current page's resources.
    pub fn register_page_resource(&mut self, kind: ResourceKind, label: &str, object_id: u32) {
        self.ctx.register_page_resource(kind, label, object_id);
    }

    /// Number of pages so far.
    pub fn page_count(&self) -> usize {
        self.ctx.pages.len()
    }

    // ---- fixed elements ----

    /// Set the header. Must happen before anything is drawn on page 1.
    pub fn set_header(&mut self, header: HeaderFooter) -> Result<()> {
        let has_content = self.ctx.pages.get(0).is_some_and(|page| page.has_content());
        self.template.set_header(header, has_content)
    }

    /// Set the footer.
    pub fn set_footer(&mut self, footer: HeaderFooter) -> Result<()> {
        self.template.set_footer(footer)
    }

    // ---- output ----

    /// Finalize the document and serialize it.
    ///
    /// A document without any drawing still gets one empty page.
    pub fn output(mut self) -> Result<Vec<u8>> {
        if self.ctx.pages.is_empty() {
            self.ctx.pages.add_page();
        }
        self.template.render(&mut self.ctx, self.config.title.as_deref())?;

        let compress = self.config.compress;
        let font_ids = self.ctx.fonts.emit_font_objects(&mut self.ctx.writer, compress)?;
        let media_box = Obj::rect(
            0.0,
            0.0,
            self.config.page_size.width as f64,
            self.config.page_size.height as f64,
        );

        let writer = &mut self.ctx.writer;
        let mut kids = Vec::with_capacity(self.ctx.pages.len());
        for page in self.ctx.pages.iter() {
            let content = page.content.build()?;
            let contents_id = writer.add_object(ObjectWriter::encoded_stream_body(None, &content, compress));

            let mut entries = vec![
                ("Type", Obj::name("Page")),
                ("Parent", Obj::reference(self.pages_id)),
                ("MediaBox", media_box.clone()),
                ("Contents", Obj::reference(contents_id)),
                ("Resources", page.resources.to_object(&font_ids)),
            ];
            if !page.annotations.is_empty() {
                let annots = page
                    .annotations
                    .iter()
                    .map(|link| Obj::reference(writer.add_value(&link.to_object())))
                    .collect();
                entries.push(("Annots", Obj::array(annots)));
            }
            kids.push(Obj::reference(writer.add_value(&Obj::dict(entries))));
        }

        let page_count = kids.len();
        writer.set_value(
            self.pages_id,
            &Obj::dict(vec![
                ("Type", Obj::name("Pages")),
                ("Kids", Obj::array(kids)),
                ("Count", Obj::integer(page_count as i64)),
            ]),
        );
        let catalog_id = writer.add_value(&Obj::dict(vec![
            ("Type", Obj::name("Catalog")),
            ("Pages", Obj::reference(self.pages_id)),
        ]));
        let info_id = writer.add_value(&info_dictionary(&self.config));

        let bytes = writer.output(catalog_id, Some(info_id))?;
        log::info!(
            "Wrote PDF: {} pages, {} fonts, {} objects, {} bytes",
            page_count,
            font_ids.len(),
            writer.max_id(),
            bytes.len()
        );
        Ok(bytes)
    }
}

fn info_dictionary(config: &DocumentConfig) -> Object {
    let text_entries = [
        ("Title", &config.title),
        ("Author", &config.author),
        ("Subject", &config.subject),
        ("Keywords", &config.keywords),
        ("Creator", &config.creator),
        ("Producer", &config.producer),
    ];
    let mut entries: Vec<(&str, Object)> = text_entries
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, Object::text(v))))
        .collect();
    if let Some(date) = &config.creation_date {
        entries.push(("CreationDate", Obj::string(&pdf_date(date))));
    }
    Obj::dict(entries)
}
