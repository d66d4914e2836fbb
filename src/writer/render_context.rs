//! State threaded through every layout call.
//!
//! There is no ambient "current page" or "current style": layout functions
//! take a `&mut RenderContext` and everything they read or change lives
//! here. Writes to pages go through [`RenderContext::content`], which hands
//! out nothing while a measurement pass is running.

use super::content_stream::ContentStreamBuilder;
use super::image_handler::{ImageInfo, ImageProvider, ImageRegistry};
use super::object_writer::ObjectWriter;
use super::page::{LinkAnnotation, PageSet, ResourceKind};
use crate::config::DocumentConfig;
use crate::error::{Error, Result};
use crate::fonts::FontRegistry;
use crate::geometry::Rect;
use crate::layout::{LayoutManager, MeasurementMode, StyleContext};

/// Mutable state shared by the layout engine and the document.
#[derive(Debug)]
pub struct RenderContext {
    /// Embedded fonts and glyph usage
    pub fonts: FontRegistry,
    /// Current text style
    pub style: StyleContext,
    /// Regions and cursor
    pub layout: LayoutManager,
    /// Dry-run depth
    pub measurement: MeasurementMode,
    /// Pages written so far
    pub pages: PageSet,
    /// Image source
    pub images: Box<dyn ImageProvider>,
    /// Object table
    pub writer: ObjectWriter,
}

impl RenderContext {
    /// Fresh state for a document with `config`, using an empty
    /// [`ImageRegistry`].
    pub fn new(config: &DocumentConfig) -> Self {
        Self::with_images(config, Box::new(ImageRegistry::new()))
    }

    /// Fresh state with a caller-supplied image source.
    pub fn with_images(config: &DocumentConfig, images: Box<dyn ImageProvider>) -> Self {
        Self {
            fonts: FontRegistry::new(),
            style: StyleContext::new(),
            layout: LayoutManager::new(config.page_size.width, config.page_size.height, &config.margins),
            measurement: MeasurementMode::new(),
            pages: PageSet::new(),
            images,
            writer: ObjectWriter::new(config.pdf_version.clone()),
        }
    }

    /// Whether a measurement pass is running.
    pub fn is_measuring(&self) -> bool {
        self.measurement.is_active()
    }

    /// Content of the current page, or `None` while measuring.
    pub fn content(&mut self) -> Option<&mut ContentStreamBuilder> {
        if self.measurement.is_active() {
            None
        } else {
            Some(&mut self.pages.current_mut().content)
        }
    }

    /// Start a new page and put the cursor at its top.
    pub fn new_page(&mut self) {
        self.layout.reset_cursor();
        if self.measurement.is_active() {
            return;
        }
        let index = self.advance_page();
        log::debug!("Started page {}", index + 1);
    }

    /// Move writing to the following page. Content written before the
    /// first page existed belongs to page 1, so that one is created first.
    fn advance_page(&mut self) -> usize {
        if self.pages.is_empty() {
            self.pages.add_page();
        }
        self.pages.next_page()
    }

    /// Break the page when `needed` points do not fit.
    ///
    /// Returns whether a new page was started.
    pub fn check_page_break(&mut self, needed: f32) -> bool {
        if !self.layout.check_page_break(needed) {
            return false;
        }
        if !self.measurement.is_active() {
            let index = self.advance_page();
            log::debug!("Page break before {:.2}pt, started page {}", needed, index + 1);
        }
        true
    }

    /// Resource label for `alias`, naming it on the current page.
    pub fn use_font(&mut self, alias: &str) -> Result<String> {
        let label = self.fonts.resource_label(alias)?;
        if !self.measurement.is_active() {
            self.pages.current_mut().resources.add_font(&label, alias);
        }
        Ok(label)
    }

    /// Add a URI link on the current page.
    pub fn add_link(&mut self, rect: Rect, uri: &str) {
        if !self.measurement.is_active() {
            self.pages
                .current_mut()
                .annotations
                .push(LinkAnnotation::uri(rect, uri));
        }
    }

    /// Name an existing object in the current page's resources.
    pub fn register_page_resource(&mut self, kind: ResourceKind, label: &str, object_id: u32) {
        if !self.measurement.is_active() {
            self.pages
                .current_mut()
                .resources
                .add_object(kind, label, object_id);
        }
    }

    /// Embed an image (once) and name it on page `page`.
    pub fn embed_image_on(&mut self, page: usize, alias: &str) -> Result<ImageInfo> {
        let info = self
            .images
            .get_image(alias, &mut self.writer)
            .ok_or_else(|| Error::ImageNotFound(alias.to_string()))?;
        if let Some(target) = self.pages.get_mut(page) {
            target
                .resources
                .add_object(ResourceKind::XObject, &info.resource_name, info.object_id);
        }
        Ok(info)
    }

    /// Draw an image into a box on the current page.
    ///
    /// While measuring only the alias is checked.
    pub fn place_image(&mut self, alias: &str, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        if self.measurement.is_active() {
            return match self.images.dimensions(alias) {
                Some(_) => Ok(()),
                None => Err(Error::ImageNotFound(alias.to_string())),
            };
        }
        self.pages.current_mut();
        let page = self.pages.current_index();
        let info = self.embed_image_on(page, alias)?;
        self.pages
            .current_mut()
            .content
            .draw_image(&info.resource_name, x, y, width, height);
        Ok(())
    }

    /// Run `layout` as a dry pass and return the height it consumed.
    ///
    /// The region stack, cursor and style are put back afterwards, on
    /// success and on error alike. Page breaks cannot happen inside the pass.
    pub fn measure<F>(&mut self, layout: F) -> Result<f32>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let snapshot = self.layout.snapshot();
        let style_depth = self.style.depth();
        let start = self.layout.cursor_y();

        self.style.push();
        self.measurement.enter();
        self.layout.unbound_bottom();

        let result = layout(self);
        let height = start - self.layout.cursor_y();

        self.measurement.exit();
        self.layout.restore(snapshot);
        while self.style.depth() > style_depth {
            self.style.pop();
        }
        result.map(|_| height)
    }
}
