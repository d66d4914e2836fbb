//! PDF content stream builder.
//!
//! Builds page content streams from graphics and text operators
//! (ISO 32000-1:2008 sections 8 and 9). Operators are kept as a list until
//! [`ContentStreamBuilder::build`], so layout code can go back and insert
//! operators at an earlier position (paragraph backgrounds are painted
//! under text that was laid out first).

use std::io::Write;

use super::object_serializer::format_real;
use crate::error::Result;
use crate::layout::Color;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font resource and size (Tf)
    SetFont(String, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show hex-encoded glyph ids (Tj)
    ShowHexText(String),
    /// Set character spacing (Tc)
    SetCharacterSpacing(f32),
    /// Set text rendering mode (Tr)
    SetTextRenderMode(TextRenderMode),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f32, f32, f32),
    /// Set stroke color RGB (RG)
    SetStrokeColorRGB(f32, f32, f32),
    /// Set fill color gray (g)
    SetFillColorGray(f32),
    /// Set stroke color gray (G)
    SetStrokeColorGray(f32),
    /// Set fill color CMYK (k)
    SetFillColorCMYK(f32, f32, f32, f32),
    /// Set stroke color CMYK (K)
    SetStrokeColorCMYK(f32, f32, f32, f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Move to (m)
    MoveTo(f32, f32),
    /// Line to (l)
    LineTo(f32, f32),
    /// Curve to (c)
    CurveTo(f32, f32, f32, f32, f32, f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Close path (h)
    ClosePath,
    /// Stroke (S)
    Stroke,
    /// Fill (f)
    Fill,
    /// End path without filling or stroking (n)
    EndPath,
    /// Clip using non-zero winding rule (W)
    Clip,
    /// Paint XObject (Do)
    PaintXObject(String),
    /// Set graphics state from an ExtGState resource (gs)
    SetExtGState(String),
    /// Paint a shading resource (sh)
    PaintShading(String),
}

/// Text rendering modes used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRenderMode {
    /// Fill glyphs (default)
    #[default]
    Fill = 0,
    /// Fill, then stroke glyph outlines (synthetic bold)
    FillStroke = 2,
}

/// Builder for page content streams.
#[derive(Debug, Default, Clone)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
    in_text_object: bool,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Operations added so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Whether nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Position marker for a later [`insert_at`](Self::insert_at).
    pub fn mark(&self) -> usize {
        self.operations.len()
    }

    /// Insert operations at a position returned by [`mark`](Self::mark), so
    /// they paint below everything added since.
    pub fn insert_at(&mut self, mark: usize, ops: Vec<ContentStreamOp>) -> &mut Self {
        let at = mark.min(self.operations.len());
        self.operations.splice(at..at, ops);
        self
    }

    /// Begin a text object.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End a text object.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
        }
        self
    }

    /// Set font resource and size.
    pub fn set_font(&mut self, resource: &str, size: f32) -> &mut Self {
        self.op(ContentStreamOp::SetFont(resource.to_string(), size))
    }

    /// Set the text matrix.
    pub fn text_matrix(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> &mut Self {
        self.op(ContentStreamOp::SetTextMatrix(a, b, c, d, e, f))
    }

    /// Show a `<XXXX...>` glyph id string.
    pub fn hex_text(&mut self, hex: &str) -> &mut Self {
        self.op(ContentStreamOp::ShowHexText(hex.to_string()))
    }

    /// Set character spacing.
    pub fn character_spacing(&mut self, spacing: f32) -> &mut Self {
        self.op(ContentStreamOp::SetCharacterSpacing(spacing))
    }

    /// Set the text rendering mode.
    pub fn render_mode(&mut self, mode: TextRenderMode) -> &mut Self {
        self.op(ContentStreamOp::SetTextRenderMode(mode))
    }

    /// Set fill color.
    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        self.op(color.fill_op())
    }

    /// Set stroke color.
    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        self.op(color.stroke_op())
    }

    /// Set line width.
    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.op(ContentStreamOp::SetLineWidth(width))
    }

    /// Move to point.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::MoveTo(x, y))
    }

    /// Line to point.
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::LineTo(x, y))
    }

    /// Cubic Bezier curve.
    pub fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> &mut Self {
        self.op(ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3))
    }

    /// Rectangle path from the lower-left corner.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.op(ContentStreamOp::Rectangle(x, y, width, height))
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) -> &mut Self {
        self.op(ContentStreamOp::ClosePath)
    }

    /// Stroke the path.
    pub fn stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Stroke)
    }

    /// Fill the path.
    pub fn fill(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Fill)
    }

    /// Intersect the clip with a rectangle and discard the path.
    pub fn clip_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.rect(x, y, width, height)
            .op(ContentStreamOp::Clip)
            .op(ContentStreamOp::EndPath)
    }

    /// Save graphics state.
    pub fn save_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore graphics state.
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Concatenate a matrix onto the CTM.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> &mut Self {
        self.op(ContentStreamOp::Transform(a, b, c, d, e, f))
    }

    /// Paint an image XObject into the given box.
    pub fn draw_image(&mut self, resource: &str, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.save_state()
            .transform(width, 0.0, 0.0, height, x, y)
            .op(ContentStreamOp::PaintXObject(resource.to_string()))
            .restore_state()
    }

    /// Apply an ExtGState resource.
    pub fn set_ext_gstate(&mut self, resource: &str) -> &mut Self {
        self.op(ContentStreamOp::SetExtGState(resource.to_string()))
    }

    /// Paint a shading resource over the current clip.
    pub fn paint_shading(&mut self, resource: &str) -> &mut Self {
        self.op(ContentStreamOp::PaintShading(resource.to_string()))
    }

    /// Serialize the operators, one per line.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        for op in &self.operations {
            write_op(&mut buf, op)?;
            writeln!(buf)?;
        }
        Ok(buf)
    }
}

/// Control point distance for approximating a quarter circle with a cubic.
pub const KAPPA: f32 = 0.552_284_8;

fn num(value: f32) -> String {
    format_real(value as f64)
}

fn nums(values: &[f32]) -> String {
    values.iter().map(|&v| num(v)).collect::<Vec<_>>().join(" ")
}

fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} cm", nums(&[*a, *b, *c, *d, *e, *f]))
        },
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, num(*size)),
        ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
            write!(w, "{} Tm", nums(&[*a, *b, *c, *d, *e, *f]))
        },
        ContentStreamOp::ShowHexText(hex) => write!(w, "{} Tj", hex),
        ContentStreamOp::SetCharacterSpacing(spacing) => write!(w, "{} Tc", num(*spacing)),
        ContentStreamOp::SetTextRenderMode(mode) => write!(w, "{} Tr", *mode as u8),
        ContentStreamOp::SetFillColorRGB(r, g, b) => write!(w, "{} rg", nums(&[*r, *g, *b])),
        ContentStreamOp::SetStrokeColorRGB(r, g, b) => write!(w, "{} RG", nums(&[*r, *g, *b])),
        ContentStreamOp::SetFillColorGray(g) => write!(w, "{} g", num(*g)),
        ContentStreamOp::SetStrokeColorGray(g) => write!(w, "{} G", num(*g)),
        ContentStreamOp::SetFillColorCMYK(c, m, y, k) => {
            write!(w, "{} k", nums(&[*c, *m, *y, *k]))
        },
        ContentStreamOp::SetStrokeColorCMYK(c, m, y, k) => {
            write!(w, "{} K", nums(&[*c, *m, *y, *k]))
        },
        ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", num(*width)),
        ContentStreamOp::MoveTo(x, y) => write!(w, "{} m", nums(&[*x, *y])),
        ContentStreamOp::LineTo(x, y) => write!(w, "{} l", nums(&[*x, *y])),
        ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3) => {
            write!(w, "{} c", nums(&[*x1, *y1, *x2, *y2, *x3, *y3]))
        },
        ContentStreamOp::Rectangle(x, y, width, height) => {
            write!(w, "{} re", nums(&[*x, *y, *width, *height]))
        },
        ContentStreamOp::ClosePath => write!(w, "h"),
        ContentStreamOp::Stroke => write!(w, "S"),
        ContentStreamOp::Fill => write!(w, "f"),
        ContentStreamOp::EndPath => write!(w, "n"),
        ContentStreamOp::Clip => write!(w, "W"),
        ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
        ContentStreamOp::SetExtGState(name) => write!(w, "/{} gs", name),
        ContentStreamOp::PaintShading(name) => write!(w, "/{} sh", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(builder: &ContentStreamBuilder) -> String {
        String::from_utf8(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_text_object() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .begin_text()
            .begin_text()
            .set_font("F1", 12.0)
            .text_matrix(1.0, 0.0, 0.0, 1.0, 72.0, 700.5)
            .hex_text("<0041>")
            .end_text()
            .end_text();

        assert_eq!(text_of(&builder), "BT\n/F1 12 Tf\n1 0 0 1 72 700.5 Tm\n<0041> Tj\nET\n");
    }

    #[test]
    fn test_numbers_are_compact() {
        let mut builder = ContentStreamBuilder::new();
        builder.rect(10.0, 20.25, 100.0 / 3.0, 0.0).fill();
        assert_eq!(text_of(&builder), "10 20.25 33.3333 0 re\nf\n");
    }

    #[test]
    fn test_insert_at_mark_paints_below() {
        let mut builder = ContentStreamBuilder::new();
        builder.save_state();
        let mark = builder.mark();
        builder.begin_text().hex_text("<0001>").end_text();
        builder.insert_at(
            mark,
            vec![ContentStreamOp::Rectangle(0.0, 0.0, 5.0, 5.0), ContentStreamOp::Fill],
        );

        let ops = builder.operations();
        assert_eq!(ops[1], ContentStreamOp::Rectangle(0.0, 0.0, 5.0, 5.0));
        assert_eq!(ops[2], ContentStreamOp::Fill);
        assert_eq!(ops[3], ContentStreamOp::BeginText);
    }

    #[test]
    fn test_render_mode_and_colors() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .render_mode(TextRenderMode::FillStroke)
            .fill_color(Color::Rgb(1.0, 0.0, 0.0))
            .stroke_color(Color::Cmyk(0.0, 0.0, 0.0, 1.0));
        assert_eq!(text_of(&builder), "2 Tr\n1 0 0 rg\n0 0 0 1 K\n");
    }

    #[test]
    fn test_clip_and_image() {
        let mut builder = ContentStreamBuilder::new();
        builder.clip_rect(0.0, 0.0, 10.0, 10.0).draw_image("Im1", 5.0, 6.0, 50.0, 40.0);
        assert_eq!(text_of(&builder), "0 0 10 10 re\nW\nn\nq\n50 0 0 40 5 6 cm\n/Im1 Do\nQ\n");
    }

    #[test]
    fn test_resource_operators() {
        let mut builder = ContentStreamBuilder::new();
        builder.set_ext_gstate("GS1").clip_rect(0.0, 0.0, 4.0, 4.0).paint_shading("Sh1");
        assert_eq!(text_of(&builder), "/GS1 gs\n0 0 4 4 re\nW\nn\n/Sh1 sh\n");
    }
}
