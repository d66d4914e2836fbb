//! Headers and footers.
//!
//! A [`HeaderFooter`] is a line of text repeated on every page. Its text
//! may contain placeholders that are filled in per page:
//!
//! - `{page}`: current page number (1-indexed)
//! - `{pages}`: total number of pages
//! - `{title}`: document title, empty when unset
//!
//! They are drawn when the document is finalized, once the page count is
//! known.
//!
//! # Example
//!
//! ```
//! use pdf_scribe::writer::{HeaderFooter, HFAlignment};
//!
//! let footer = HeaderFooter::new("{page} / {pages}").with_align(HFAlignment::Right);
//! assert_eq!(footer.resolve(2, 5, None), "2 / 5");
//! ```

use serde::{Deserialize, Serialize};

use super::render_context::RenderContext;
use crate::error::{Error, Result};
use crate::layout::Color;

/// Placeholder tokens that can be used in headers and footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Current page number (1-indexed)
    PageNumber,
    /// Total number of pages
    TotalPages,
    /// Document title
    Title,
}

impl Placeholder {
    /// All placeholders.
    pub const ALL: [Placeholder; 3] = [Placeholder::PageNumber, Placeholder::TotalPages, Placeholder::Title];

    /// The token string.
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::PageNumber => "{page}",
            Placeholder::TotalPages => "{pages}",
            Placeholder::Title => "{title}",
        }
    }
}

/// Text alignment for header/footer content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HFAlignment {
    /// Align to the left margin
    Left,
    /// Center horizontally
    #[default]
    Center,
    /// Align to the right margin
    Right,
}

/// Where a fixed element sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFooterKind {
    Header,
    Footer,
}

impl HeaderFooterKind {
    fn name(&self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "header",
            HeaderFooterKind::Footer => "footer",
        }
    }
}

/// A line of text repeated on every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderFooter {
    /// Text with placeholders
    pub text: String,
    pub align: HFAlignment,
    /// Font alias; falls back to the font active when the document is output
    pub font: Option<String>,
    /// Font size; defaults to 9pt
    pub size: f32,
    pub color: Color,
    /// Distance from the page edge to the baseline
    pub offset: f32,
}

impl Default for HeaderFooter {
    fn default() -> Self {
        Self {
            text: String::new(),
            align: HFAlignment::Center,
            font: None,
            size: 9.0,
            color: Color::black(),
            offset: 36.0,
        }
    }
}

impl HeaderFooter {
    /// Centered element with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the alignment.
    pub fn with_align(mut self, align: HFAlignment) -> Self {
        self.align = align;
        self
    }

    /// Set the font alias and size.
    pub fn with_font(mut self, alias: impl Into<String>, size: f32) -> Self {
        self.font = Some(alias.into());
        self.size = size;
        self
    }

    /// Set the text color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the distance from the page edge to the baseline.
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    /// Text with placeholders filled in.
    pub fn resolve(&self, page: usize, pages: usize, title: Option<&str>) -> String {
        let mut text = self.text.clone();
        for placeholder in Placeholder::ALL {
            if !text.contains(placeholder.token()) {
                continue;
            }
            let value = match placeholder {
                Placeholder::PageNumber => page.to_string(),
                Placeholder::TotalPages => pages.to_string(),
                Placeholder::Title => title.unwrap_or_default().to_string(),
            };
            text = text.replace(placeholder.token(), &value);
        }
        text
    }
}

/// The header and footer of a document.
#[derive(Debug, Clone, Default)]
pub struct PageTemplate {
    header: Option<HeaderFooter>,
    footer: Option<HeaderFooter>,
}

impl PageTemplate {
    /// Create an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header.
    ///
    /// Fails when a header exists or when the first page already has
    /// content, since the header's space would then be taken.
    pub fn set_header(&mut self, header: HeaderFooter, first_page_has_content: bool) -> Result<()> {
        if self.header.is_some() {
            return Err(Error::DuplicateHeaderFooter(HeaderFooterKind::Header.name()));
        }
        if first_page_has_content {
            return Err(Error::HeaderAfterContent);
        }
        self.header = Some(header);
        Ok(())
    }

    /// Set the footer. Fails when a footer exists.
    pub fn set_footer(&mut self, footer: HeaderFooter) -> Result<()> {
        if self.footer.is_some() {
            return Err(Error::DuplicateHeaderFooter(HeaderFooterKind::Footer.name()));
        }
        self.footer = Some(footer);
        Ok(())
    }

    /// The header, if set.
    pub fn header(&self) -> Option<&HeaderFooter> {
        self.header.as_ref()
    }

    /// The footer, if set.
    pub fn footer(&self) -> Option<&HeaderFooter> {
        self.footer.as_ref()
    }

    /// Whether neither is set.
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.footer.is_none()
    }

    /// Draw the header and footer on every page.
    pub fn render(&self, ctx: &mut RenderContext, title: Option<&str>) -> Result<()> {
        let pages = ctx.pages.len();
        for index in 0..pages {
            ctx.pages.set_current(index);
            for (kind, element) in [
                (HeaderFooterKind::Header, &self.header),
                (HeaderFooterKind::Footer, &self.footer),
            ] {
                if let Some(element) = element {
                    draw_element(ctx, kind, element, index + 1, pages, title)?;
                }
            }
        }
        Ok(())
    }
}

fn draw_element(
    ctx: &mut RenderContext,
    kind: HeaderFooterKind,
    element: &HeaderFooter,
    page: usize,
    pages: usize,
    title: Option<&str>,
) -> Result<()> {
    let alias = element
        .font
        .clone()
        .or_else(|| ctx.style.current().font_alias.clone())
        .ok_or(Error::NoActiveFont)?;
    let text = element.resolve(page, pages, title);
    if text.trim().is_empty() {
        return Ok(());
    }

    let width = ctx.fonts.text_width(&alias, &text, element.size, 0.0)?;
    let left = ctx.layout.x();
    let available = ctx.layout.width();
    let x = match element.align {
        HFAlignment::Left => left,
        HFAlignment::Center => left + (available - width) / 2.0,
        HFAlignment::Right => left + available - width,
    };
    let y = match kind {
        HeaderFooterKind::Header => ctx.layout.page_height() - element.offset,
        HeaderFooterKind::Footer => element.offset,
    };

    let label = ctx.use_font(&alias)?;
    let hex = ctx.fonts.encode_text(&alias, &text)?;
    if let Some(content) = ctx.content() {
        content
            .save_state()
            .begin_text()
            .set_font(&label, element.size)
            .fill_color(element.color)
            .text_matrix(1.0, 0.0, 0.0, 1.0, x, y)
            .hex_text(&hex)
            .end_text()
            .restore_state();
    }
    Ok(())
}
