//! Paragraph layout.
//!
//! [`TextLayoutEngine::add_paragraph_runs`] turns styled runs into lines:
//!
//! 1. every run is resolved against the current style into a token style
//!    (font face, effective size, baseline rise, decorations);
//! 2. the runs are tokenized into newline-separated blocks and measured;
//! 3. each block is broken greedily, lines are placed and drawn, breaking
//!    the page before any line that does not fit;
//! 4. the paragraph box (background, border, background image) is painted
//!    underneath the text, one piece per page.
//!
//! The same code computes heights: under measurement mode nothing reaches a
//! page, so running it through [`RenderContext::measure`] gives the height
//! a paragraph would take.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::fragments::{BorderSpec, BoxDecoration, FragmentKind, FragmentTracker, Padding};
use super::line_breaker::{baseline_offset, break_lines, place_line, LineSpan, MeasuredToken, TextAlign};
use super::style_context::{StyleMarkers, StyleState};
use super::tokenizer::{tokenize, RunStyle, TextRun, Token, TokenKind, VerticalAlign, DEFAULT_SCRIPT_SCALE};
use crate::error::{Error, Result};
use crate::fonts::FontRegistry;
use crate::geometry::Rect;
use crate::writer::{RenderContext, TextRenderMode};

/// Stroke width of synthetic bold as a fraction of the font size.
const SYNTHETIC_BOLD_STROKE: f32 = 0.04;
/// Underline position below the baseline as a fraction of the font size.
const UNDERLINE_OFFSET: f32 = 0.20;
/// Underline thickness as a fraction of the font size.
const UNDERLINE_THICKNESS: f32 = 0.06;
/// Thinnest underline drawn.
const MIN_UNDERLINE_THICKNESS: f32 = 0.3;
/// Superscript rise as a fraction of the line height.
const SUPERSCRIPT_RISE: f32 = 0.35;
/// Subscript drop as a fraction of the line height.
const SUBSCRIPT_DROP: f32 = 0.15;

/// Which side of the gutter a marker hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerAlign {
    Left,
    #[default]
    Right,
}

/// A marker (bullet, number) drawn in the first line's indent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSpec {
    /// Marker text
    pub text: String,
    /// Placement inside the gutter
    pub align: MarkerAlign,
    /// Space kept between a right-aligned marker and the text
    pub gap: f32,
    /// Style overrides for the marker
    pub style: RunStyle,
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            align: MarkerAlign::Right,
            gap: 6.0,
            style: RunStyle::default(),
        }
    }
}

impl MarkerSpec {
    /// Right-aligned marker with the default gap.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Paragraph-level options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphOptions {
    pub align: TextAlign,
    /// Indent of the first line
    pub indent: f32,
    /// Indent of every following line
    pub hang_indent: f32,
    /// Line height multiplier
    pub line_spacing: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub background: Option<Color>,
    pub border: Option<BorderSpec>,
    pub padding: Padding,
    pub marker: Option<MarkerSpec>,
    /// Image alias stretched over the box
    pub background_image: Option<String>,
}

impl Default for ParagraphOptions {
    fn default() -> Self {
        Self {
            align: TextAlign::Left,
            indent: 0.0,
            hang_indent: 0.0,
            line_spacing: 1.0,
            space_before: 0.0,
            space_after: 0.0,
            background: None,
            border: None,
            padding: Padding::default(),
            marker: None,
            background_image: None,
        }
    }
}

impl ParagraphOptions {
    /// Options with the given alignment.
    pub fn aligned(align: TextAlign) -> Self {
        Self {
            align,
            ..Default::default()
        }
    }

    fn has_box(&self) -> bool {
        self.background.is_some() || self.border.is_some() || self.background_image.is_some()
    }

    fn border_width(&self) -> f32 {
        self.border.map_or(0.0, |b| b.width.max(0.0))
    }
}

/// What laying out a paragraph produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphLayout {
    /// Lines emitted, blank lines included
    pub lines: usize,
    /// Vertical space consumed, page breaks excluded
    pub height: f32,
    /// Box pieces painted, one per page the box touched
    pub fragments: Vec<FragmentKind>,
}

/// A run's style, fully resolved for drawing.
#[derive(Debug, Clone)]
struct TokenStyle {
    alias: String,
    size: f32,
    line_height: f32,
    ascent: f32,
    descent: f32,
    color: Color,
    letter_spacing: f32,
    word_spacing: f32,
    synthetic_bold: bool,
    shear: f32,
    underline: bool,
    rise: f32,
    href: Option<String>,
    background: Option<Color>,
}

impl TokenStyle {
    fn resolve(fonts: &FontRegistry, state: &StyleState, run: &RunStyle) -> Result<Self> {
        let base = state.font_alias.as_deref().ok_or(Error::NoActiveFont)?;
        let face = fonts.resolve_alias_by_style(base, state.markers);
        let descriptor = fonts.descriptor(&face.alias)?;

        let scale = run.script_scale.unwrap_or(DEFAULT_SCRIPT_SCALE);
        let (size, rise) = match run.vertical {
            VerticalAlign::Baseline => (state.font_size, run.baseline_shift.unwrap_or(0.0)),
            VerticalAlign::Superscript => (
                state.font_size * scale,
                run.baseline_shift
                    .unwrap_or(state.line_height * SUPERSCRIPT_RISE),
            ),
            VerticalAlign::Subscript => (
                state.font_size * scale,
                run.baseline_shift
                    .unwrap_or(-state.line_height * SUBSCRIPT_DROP),
            ),
        };
        let units = descriptor.scale(size);

        Ok(Self {
            size,
            line_height: state.line_height,
            ascent: descriptor.ascent as f32 * units,
            descent: descriptor.descent as f32 * units,
            color: state.text_color,
            letter_spacing: state.letter_spacing,
            word_spacing: state.word_spacing,
            synthetic_bold: face.synthetic_bold,
            shear: if face.synthetic_italic {
                state.italic_angle_deg.to_radians().tan()
            } else {
                0.0
            },
            underline: state.markers.contains(StyleMarkers::UNDERLINE),
            rise,
            href: run.href.clone(),
            background: run.background,
            alias: face.alias,
        })
    }

    fn glyph_height(&self) -> f32 {
        self.ascent - self.descent
    }
}

type StyledToken = Token<Rc<TokenStyle>>;

/// Resolve `run` on top of the current style without changing it.
fn resolve_run(ctx: &mut RenderContext, run: &RunStyle) -> Result<TokenStyle> {
    ctx.style.push();
    ctx.style.apply_options(&run.style_options());
    let resolved = TokenStyle::resolve(&ctx.fonts, ctx.style.current(), run);
    ctx.style.pop();
    resolved
}

fn measure_token(fonts: &FontRegistry, token: &StyledToken) -> Result<MeasuredToken> {
    let style = &token.style;
    Ok(match &token.kind {
        TokenKind::Word(text) => {
            MeasuredToken::word(fonts.text_width(&style.alias, text, style.size, style.letter_spacing)?)
        },
        TokenKind::Space(text) => {
            let width = fonts.text_width(&style.alias, text, style.size, style.letter_spacing)?;
            MeasuredToken::space(width + style.word_spacing * text.chars().count() as f32)
        },
        TokenKind::Inline(object) => MeasuredToken::word(object.width()),
    })
}

/// A token after measuring.
struct Placed {
    token: StyledToken,
    width: f32,
}

/// Lays out paragraphs against a [`RenderContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLayoutEngine;

impl TextLayoutEngine {
    /// Lay out and draw a paragraph at the cursor.
    ///
    /// Fails with [`Error::NoActiveFont`] when no font is selected. A
    /// paragraph without any words or inline objects draws nothing and
    /// leaves the cursor where it was.
    pub fn add_paragraph_runs(
        ctx: &mut RenderContext,
        runs: &[TextRun],
        options: &ParagraphOptions,
    ) -> Result<ParagraphLayout> {
        let base = ctx.style.current().clone();
        if base.font_alias.is_none() {
            return Err(Error::NoActiveFont);
        }

        let mut styles = Vec::with_capacity(runs.len());
        for run in runs {
            styles.push(Rc::new(resolve_run(ctx, &run.style)?));
        }
        let base_style = Rc::new(TokenStyle::resolve(&ctx.fonts, &base, &RunStyle::default())?);

        let blocks = tokenize(runs.iter().zip(styles.iter().cloned()));
        let has_words = blocks
            .iter()
            .flatten()
            .any(|token| !token.is_space());
        if !has_words {
            log::debug!("Paragraph has no words; nothing drawn");
            return Ok(ParagraphLayout::default());
        }

        let mut measured = Vec::with_capacity(blocks.len());
        for block in blocks {
            let mut placed = Vec::with_capacity(block.len());
            for token in block {
                let width = measure_token(&ctx.fonts, &token)?.width;
                placed.push(Placed { token, width });
            }
            measured.push(placed);
        }

        let depth = ctx.style.depth();
        let result = ParagraphWriter::new(ctx, options, base_style).run(&measured);
        while ctx.style.depth() > depth {
            ctx.style.pop();
        }
        result
    }

    /// Height the paragraph would take, without drawing it.
    pub fn compute_height(ctx: &mut RenderContext, runs: &[TextRun], options: &ParagraphOptions) -> Result<f32> {
        ctx.measure(|c| Self::add_paragraph_runs(c, runs, options).map(|_| ()))
    }
}

/// Per-call state of one paragraph being drawn.
struct ParagraphWriter<'a> {
    ctx: &'a mut RenderContext,
    options: &'a ParagraphOptions,
    base: Rc<TokenStyle>,
    decoration: BoxDecoration,
    fragments: FragmentTracker,
    left: f32,
    wrap_width: f32,
    consumed: f32,
    lines: usize,
}

impl<'a> ParagraphWriter<'a> {
    fn new(ctx: &'a mut RenderContext, options: &'a ParagraphOptions, base: Rc<TokenStyle>) -> Self {
        let inset = options.border_width();
        let x = ctx.layout.x();
        let width = ctx.layout.width();
        let left = x + inset + options.padding.left;
        let wrap_width = (width - 2.0 * inset - options.padding.left - options.padding.right).max(0.0);
        Self {
            decoration: BoxDecoration {
                x,
                width,
                background: options.background,
                border: options.border,
                image: None,
            },
            ctx,
            options,
            base,
            fragments: FragmentTracker::new(),
            left,
            wrap_width,
            consumed: 0.0,
            lines: 0,
        }
    }

    fn advance(&mut self, height: f32) {
        self.ctx.layout.advance_cursor(height);
        self.consumed += height;
    }

    fn open_fragment(&mut self) {
        let mark = self.ctx.content().map_or(0, |c| c.mark());
        let page = self.ctx.pages.current_index();
        self.fragments.open(page, mark, self.ctx.layout.cursor_y());
    }

    fn line_height(&self, tokens: &[Placed], line: &LineSpan) -> (f32, Rc<TokenStyle>) {
        let mut tallest = self.base.clone();
        if !line.is_empty() {
            tallest = tokens[line.start].token.style.clone();
            for placed in &tokens[line.start..line.end] {
                if placed.token.style.line_height > tallest.line_height {
                    tallest = placed.token.style.clone();
                }
            }
        }
        let mut height = tallest.line_height;
        for placed in &tokens[line.start..line.end] {
            if let TokenKind::Inline(object) = &placed.token.kind {
                height = height.max(object.height());
            }
        }
        (height * self.options.line_spacing, tallest)
    }

    fn run(mut self, blocks: &[Vec<Placed>]) -> Result<ParagraphLayout> {
        let options = self.options;
        let pad = options.padding;
        let inset = options.border_width();
        self.advance(options.space_before);

        // Keep the box top and the first line together.
        let first_height = blocks
            .first()
            .map(|tokens| {
                let spans = self.break_block(tokens, true);
                spans.first().map(|l| self.line_height(tokens, l).0).unwrap_or(0.0)
            })
            .unwrap_or(0.0);
        self.ctx.check_page_break(inset + pad.top + first_height);

        let boxed = options.has_box();
        if boxed {
            self.open_fragment();
        }
        self.advance(inset + pad.top);

        for (index, tokens) in blocks.iter().enumerate() {
            let spans = self.break_block(tokens, index == 0);
            for span in &spans {
                let first_line = self.lines == 0;
                let (height, tallest) = self.line_height(tokens, span);

                let before = self.ctx.layout.cursor_y();
                if self.ctx.check_page_break(height) {
                    if boxed {
                        self.fragments.close(before);
                        self.open_fragment();
                    }
                    log::debug!("Paragraph continues on a new page after {} lines", self.lines);
                }

                let top = self.ctx.layout.cursor_y();
                let baseline = top - baseline_offset(height, tallest.ascent, tallest.descent);
                self.draw_line(tokens, span, first_line, baseline)?;
                self.advance(height);
                self.lines += 1;
            }
        }

        self.advance(pad.bottom + inset);
        let fragments = if boxed {
            self.fragments.close(self.ctx.layout.cursor_y());
            self.paint_box()?
        } else {
            Vec::new()
        };
        self.advance(options.space_after);

        Ok(ParagraphLayout {
            lines: self.lines,
            height: self.consumed,
            fragments,
        })
    }

    fn available(&self, first: bool) -> f32 {
        let indent = if first { self.options.indent } else { self.options.hang_indent };
        (self.wrap_width - indent).max(0.0)
    }

    fn break_block(&self, tokens: &[Placed], first_block: bool) -> Vec<LineSpan> {
        let measured: Vec<MeasuredToken> = tokens
            .iter()
            .map(|p| MeasuredToken {
                width: p.width,
                is_space: p.token.is_space(),
            })
            .collect();
        let rest = self.available(false);
        let first = if first_block { self.available(true) } else { rest };
        break_lines(&measured, first, rest)
    }

    fn draw_line(&mut self, tokens: &[Placed], span: &LineSpan, first_line: bool, baseline: f32) -> Result<()> {
        let options = self.options;
        let indent = if first_line { options.indent } else { options.hang_indent };
        let placement = place_line(options.align, self.available(first_line), span);
        let mut x = self.left + indent + placement.offset_x;

        if first_line {
            if let Some(marker) = &options.marker {
                self.draw_marker(marker, baseline)?;
            }
        }

        for placed in &tokens[span.start..span.end] {
            let style = &placed.token.style;
            match &placed.token.kind {
                TokenKind::Space(_) => {
                    let width = placed.width + placement.extra_per_space;
                    self.decorate(style, x, baseline, width);
                    x += width;
                },
                TokenKind::Word(text) => {
                    self.decorate(style, x, baseline, placed.width);
                    self.draw_text(style, text, x, baseline)?;
                    if let Some(href) = &style.href {
                        let rect = Rect::new(x, baseline + style.rise + style.descent, placed.width, style.glyph_height());
                        self.ctx.add_link(rect, href);
                    }
                    x += placed.width;
                },
                TokenKind::Inline(object) => {
                    if !self.ctx.is_measuring() {
                        object.draw(self.ctx, x, baseline + style.rise)?;
                    }
                    x += placed.width;
                },
            }
        }
        Ok(())
    }

    /// Background highlight and underline of one token.
    fn decorate(&mut self, style: &TokenStyle, x: f32, baseline: f32, width: f32) {
        let Some(content) = self.ctx.content() else {
            return;
        };
        let y = baseline + style.rise;
        if let Some(color) = style.background {
            content
                .save_state()
                .fill_color(color)
                .rect(x, y + style.descent, width, style.glyph_height())
                .fill()
                .restore_state();
        }
        if style.underline {
            let thickness = (style.size * UNDERLINE_THICKNESS).max(MIN_UNDERLINE_THICKNESS);
            let line_y = y - style.size * UNDERLINE_OFFSET;
            content
                .save_state()
                .stroke_color(style.color)
                .set_line_width(thickness)
                .move_to(x, line_y)
                .line_to(x + width, line_y)
                .stroke()
                .restore_state();
        }
    }

    fn draw_text(&mut self, style: &TokenStyle, text: &str, x: f32, baseline: f32) -> Result<()> {
        if self.ctx.is_measuring() {
            return Ok(());
        }
        let label = self.ctx.use_font(&style.alias)?;
        let hex = self.ctx.fonts.encode_text(&style.alias, text)?;
        if let Some(content) = self.ctx.content() {
            content.save_state().begin_text().set_font(&label, style.size).fill_color(style.color);
            if style.synthetic_bold {
                content
                    .render_mode(TextRenderMode::FillStroke)
                    .stroke_color(style.color)
                    .set_line_width(style.size * SYNTHETIC_BOLD_STROKE);
            }
            if style.letter_spacing != 0.0 {
                content.character_spacing(style.letter_spacing);
            }
            content
                .text_matrix(1.0, 0.0, style.shear, 1.0, x, baseline + style.rise)
                .hex_text(&hex)
                .end_text()
                .restore_state();
        }
        Ok(())
    }

    fn draw_marker(&mut self, marker: &MarkerSpec, baseline: f32) -> Result<()> {
        let style = resolve_run(self.ctx, &marker.style)?;
        let width = self
            .ctx
            .fonts
            .text_width(&style.alias, &marker.text, style.size, style.letter_spacing)?;
        let gutter_left = self.left;
        let x = match marker.align {
            MarkerAlign::Left => gutter_left,
            MarkerAlign::Right => gutter_left + self.options.indent - marker.gap - width,
        };
        self.draw_text(&style, &marker.text, x, baseline)
    }

    /// Paint every box piece under the text it belongs to.
    fn paint_box(&mut self) -> Result<Vec<FragmentKind>> {
        let pieces = std::mem::take(&mut self.fragments).finish();
        let kinds = pieces.iter().map(|(kind, _)| *kind).collect();
        if self.ctx.is_measuring() {
            return Ok(kinds);
        }

        let options = self.options;
        for (kind, fragment) in &pieces {
            let mut decoration = self.decoration.clone();
            if let Some(alias) = &options.background_image {
                let info = self.ctx.embed_image_on(fragment.page, alias)?;
                decoration.image = Some(info.resource_name);
            }
            if !decoration.is_visible() {
                continue;
            }
            let ops = decoration.fragment_ops(*kind, fragment);
            if let Some(page) = self.ctx.pages.get_mut(fragment.page) {
                page.content.insert_at(fragment.mark, ops);
            }
        }
        log::debug!("Painted paragraph box in {} pieces", pieces.len());
        Ok(kinds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DocumentConfig, Margins, PageSize};
    use crate::fonts::test_font::latin_font;
    use crate::writer::ContentStreamOp;

    fn context(height: f32) -> RenderContext {
        let config = DocumentConfig::default()
            .with_page_size(PageSize::new(300.0, height))
            .with_margins(Margins::uniform(50.0));
        let mut ctx = RenderContext::new(&config);
        ctx.fonts.add_font("body", latin_font()).unwrap();
        ctx.style.set_font("body", 10.0, None);
        ctx
    }

    fn shown(ctx: &RenderContext) -> Vec<String> {
        ctx.pages
            .iter()
            .flat_map(|page| page.content.operations())
            .filter_map(|op| match op {
                ContentStreamOp::ShowHexText(hex) => Some(hex.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_requires_font() {
        let mut ctx = RenderContext::new(&DocumentConfig::default());
        let err = TextLayoutEngine::add_paragraph_runs(&mut ctx, &[TextRun::new("x")], &ParagraphOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NoActiveFont));
    }

    #[test]
    fn test_single_line() {
        let mut ctx = context(400.0);
        let layout =
            TextLayoutEngine::add_paragraph_runs(&mut ctx, &[TextRun::new("AB")], &ParagraphOptions::default())
                .unwrap();
        assert_eq!(layout.lines, 1);
        assert!((layout.height - 12.5).abs() < 1e-4);
        assert!((ctx.layout.cursor_y() - 337.5).abs() < 1e-4);
        // 'A' and 'B' are glyphs 34 and 35
        assert_eq!(shown(&ctx), vec!["<00220023>"]);
    }

    #[test]
    fn test_empty_paragraph_consumes_nothing() {
        let mut ctx = context(400.0);
        let layout = TextLayoutEngine::add_paragraph_runs(
            &mut ctx,
            &[TextRun::new("   ")],
            &ParagraphOptions {
                space_before: 10.0,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(layout.lines, 0);
        assert_eq!(ctx.layout.cursor_y(), 350.0);
        assert!(ctx.pages.is_empty());
    }

    #[test]
    fn test_blank_line_between_blocks() {
        let mut ctx = context(400.0);
        let layout =
            TextLayoutEngine::add_paragraph_runs(&mut ctx, &[TextRun::new("A\n\nB")], &ParagraphOptions::default())
                .unwrap();
        assert_eq!(layout.lines, 3);
        assert_eq!(shown(&ctx).len(), 2);
    }

    #[test]
    fn test_compute_height_leaves_no_trace() {
        let mut ctx = context(400.0);
        let runs = [TextRun::new("Some words that wrap over a couple of lines in a narrow box")];
        let height = TextLayoutEngine::compute_height(&mut ctx, &runs, &ParagraphOptions::default()).unwrap();
        assert!(height > 12.5);
        assert_eq!(ctx.layout.cursor_y(), 350.0);
        assert!(ctx.pages.is_empty());
        assert!(!ctx.fonts.used_glyphs().is_used("body"));
        assert_eq!(ctx.style.depth(), 0);

        let layout = TextLayoutEngine::add_paragraph_runs(&mut ctx, &runs, &ParagraphOptions::default()).unwrap();
        assert!((layout.height - height).abs() < 1e-4);
    }

    #[test]
    fn test_synthetic_bold_strokes_outline() {
        let mut ctx = context(400.0);
        TextLayoutEngine::add_paragraph_runs(&mut ctx, &[TextRun::new("A").bold()], &ParagraphOptions::default())
            .unwrap();
        let ops = ctx.pages.get(0).unwrap().content.operations();
        assert!(ops.contains(&ContentStreamOp::SetTextRenderMode(TextRenderMode::FillStroke)));
        let stroke = ops
            .iter()
            .find_map(|op| match op {
                ContentStreamOp::SetLineWidth(w) => Some(*w),
                _ => None,
            })
            .unwrap();
        assert!((stroke - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_synthetic_italic_shears() {
        let mut ctx = context(400.0);
        TextLayoutEngine::add_paragraph_runs(&mut ctx, &[TextRun::new("A").italic()], &ParagraphOptions::default())
            .unwrap();
        let shear = ctx
            .pages
            .get(0)
            .unwrap()
            .content
            .operations()
            .iter()
            .find_map(|op| match op {
                ContentStreamOp::SetTextMatrix(_, _, c, _, _, _) => Some(*c),
                _ => None,
            })
            .unwrap();
        assert!((shear - 12f32.to_radians().tan()).abs() < 1e-6);
    }

    #[test]
    fn test_link_annotation_recorded() {
        let mut ctx = context(400.0);
        TextLayoutEngine::add_paragraph_runs(
            &mut ctx,
            &[TextRun::new("go").link("https://example.com")],
            &ParagraphOptions::default(),
        )
        .unwrap();
        let page = ctx.pages.get(0).unwrap();
        assert_eq!(page.annotations.len(), 1);
        assert_eq!(page.annotations[0].uri, "https://example.com");
    }

    #[test]
    fn test_background_painted_under_text() {
        let mut ctx = context(400.0);
        let options = ParagraphOptions {
            background: Some(Color::rgb(0.9, 0.9, 0.9)),
            padding: Padding::uniform(4.0),
            ..Default::default()
        };
        let layout = TextLayoutEngine::add_paragraph_runs(&mut ctx, &[TextRun::new("A")], &options).unwrap();
        assert_eq!(layout.fragments, vec![FragmentKind::Single]);
        let ops = ctx.pages.get(0).unwrap().content.operations();
        let fill = ops.iter().position(|op| *op == ContentStreamOp::Fill).unwrap();
        let text = ops
            .iter()
            .position(|op| matches!(op, ContentStreamOp::ShowHexText(_)))
            .unwrap();
        assert!(fill < text);
    }
}
